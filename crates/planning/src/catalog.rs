//! Product catalog operations and helpers for the free-text product fields.

use crate::models::{CreateProductRequest, PackagePlacement, Product, ProductFilter, UpdateProductRequest};
use crate::planner::MediaPlanner;
use chrono::Utc;
use mediaplan_core::{PlanError, PlanResult, ProductCategory};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

const NOTICE_MARKER: &str = "**";
const PLATFORM_MARKERS: [&str; 3] = ["Desktop:", "Tablet:", "Mobile:"];

/// Targeting text split into its highlighted notice and the remaining copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetingNotice {
    pub notice: Option<String>,
    pub content: String,
}

/// Ad sizes for one platform, or for all platforms when `platform` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdSizeGroup {
    pub platform: Option<String>,
    pub sizes: Vec<String>,
}

/// Pull the first `**...**` segment out of targeting text.
pub fn split_targeting_notice(targeting: &str) -> TargetingNotice {
    let parsed = targeting.find(NOTICE_MARKER).and_then(|open| {
        let inner_start = open + NOTICE_MARKER.len();
        targeting[inner_start..]
            .find(NOTICE_MARKER)
            .map(|len| (open, inner_start, inner_start + len))
    });
    match parsed {
        Some((open, inner_start, close)) => {
            let before = &targeting[..open];
            let after = targeting[close + NOTICE_MARKER.len()..].trim_start();
            TargetingNotice {
                notice: Some(targeting[inner_start..close].to_string()),
                content: format!("{before}{after}").trim().to_string(),
            }
        }
        None => TargetingNotice {
            notice: None,
            content: targeting.to_string(),
        },
    }
}

/// Split ad size text on `Desktop:` / `Tablet:` / `Mobile:` prefixes.
///
/// Text before the first prefix, or text with no prefix at all, becomes a
/// group without a platform.
pub fn parse_ad_sizes(ad_sizes: &str) -> Vec<AdSizeGroup> {
    let mut starts: Vec<(usize, &str)> = PLATFORM_MARKERS
        .iter()
        .flat_map(|marker| ad_sizes.match_indices(marker))
        .collect();
    starts.sort_by_key(|(index, _)| *index);

    let mut groups = Vec::new();
    let head_end = starts.first().map(|(index, _)| *index).unwrap_or(ad_sizes.len());
    let head = split_sizes(&ad_sizes[..head_end]);
    if !head.is_empty() {
        groups.push(AdSizeGroup { platform: None, sizes: head });
    }
    for (i, (index, marker)) in starts.iter().enumerate() {
        let body_start = index + marker.len();
        let body_end = starts.get(i + 1).map(|(next, _)| *next).unwrap_or(ad_sizes.len());
        groups.push(AdSizeGroup {
            platform: Some(marker.trim_end_matches(':').to_string()),
            sizes: split_sizes(&ad_sizes[body_start..body_end]),
        });
    }
    groups
}

fn split_sizes(text: &str) -> Vec<String> {
    text.split([',', '|', ';', '\n'])
        .map(str::trim)
        .filter(|size| !size.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode the placement list of a package product. Non-package products have none.
pub fn package_placements(product: &Product) -> PlanResult<Vec<PackagePlacement>> {
    if !product.is_package {
        return Ok(Vec::new());
    }
    decode_placements(product.package_placements.as_deref())
}

fn decode_placements(raw: Option<&str>) -> PlanResult<Vec<PackagePlacement>> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| PlanError::validation(format!("package_placements is not a valid placement list: {e}"))),
        None => Ok(Vec::new()),
    }
}

fn validate_product(product: &Product) -> PlanResult<()> {
    if product.name.trim().is_empty() {
        return Err(PlanError::validation("name must not be empty"));
    }
    if product.placement_name.trim().is_empty() {
        return Err(PlanError::validation("placement_name must not be empty"));
    }
    if product.is_package {
        let placements = decode_placements(product.package_placements.as_deref())?;
        if placements.is_empty() {
            return Err(PlanError::validation("package products need at least one placement"));
        }
        if placements.iter().any(|p| p.name.trim().is_empty()) {
            return Err(PlanError::validation("package placement names must not be empty"));
        }
    }
    Ok(())
}

impl MediaPlanner {
    pub fn list_products(&self, filter: &ProductFilter) -> Vec<Product> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        self.store.products.list(|product| match (&search, filter.category) {
            (Some(query), _) => {
                product.name.to_lowercase().contains(query)
                    || product.category.as_str().to_lowercase().contains(query)
                    || product.targeting_details.to_lowercase().contains(query)
            }
            (None, Some(category)) => product.category == category,
            (None, None) => true,
        })
    }

    pub fn get_product(&self, id: i64) -> PlanResult<Product> {
        self.store.products.get(id)
    }

    pub fn create_product(&self, req: CreateProductRequest) -> PlanResult<Product> {
        let draft = Product {
            id: 0,
            name: req.name,
            category: req.category,
            targeting_details: req.targeting_details,
            placement_name: req.placement_name,
            ad_sizes: req.ad_sizes,
            pricing_model: req.pricing_model,
            is_package: req.is_package,
            package_placements: req.package_placements,
            created_at: Utc::now(),
        };
        validate_product(&draft)?;
        let product = self.store.products.create(|id| Product { id, ..draft });
        info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Edit a product. Existing line items keep their own snapshot.
    pub fn update_product(&self, id: i64, req: UpdateProductRequest) -> PlanResult<Product> {
        let mut product = self.store.products.get(id)?;
        if let Some(name) = req.name {
            product.name = name;
        }
        if let Some(category) = req.category {
            product.category = category;
        }
        if let Some(targeting_details) = req.targeting_details {
            product.targeting_details = targeting_details;
        }
        if let Some(placement_name) = req.placement_name {
            product.placement_name = placement_name;
        }
        if let Some(ad_sizes) = req.ad_sizes {
            product.ad_sizes = ad_sizes;
        }
        if let Some(pricing_model) = req.pricing_model {
            product.pricing_model = pricing_model;
        }
        if let Some(is_package) = req.is_package {
            product.is_package = is_package;
        }
        if let Some(placements) = req.package_placements {
            product.package_placements = Some(placements);
        }
        validate_product(&product)?;
        self.store.products.replace(product)
    }

    /// Delete a product. Refused while any line item still references it.
    pub fn delete_product(&self, id: i64) -> PlanResult<Product> {
        let _refs = self.product_refs_exclusive();
        self.store.products.get(id)?;
        let references = self.store.line_items.count(|item| item.product_id == id);
        if references > 0 {
            warn!(product_id = id, references, "Refusing to delete referenced product");
            return Err(PlanError::Conflict(format!(
                "product {id} is referenced by {references} line item(s)"
            )));
        }
        let product = self.store.products.remove(id)?;
        info!(product_id = id, "Product deleted");
        Ok(product)
    }

    /// Distinct categories present in the catalog, sorted.
    pub fn categories(&self) -> Vec<ProductCategory> {
        self.store
            .products
            .list(|_| true)
            .into_iter()
            .map(|p| p.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
