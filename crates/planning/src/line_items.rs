//! Line item writes. Each one derives the cost, persists the item, and
//! rolls up the owning version while holding that version's lock.

use crate::catalog;
use crate::cost::line_item_cost;
use crate::models::{AddProductRequest, CreateLineItemRequest, LineItem, Product, UpdateLineItemRequest};
use crate::planner::MediaPlanner;
use chrono::{NaiveDate, Utc};
use mediaplan_core::money::{parse_amount, zero_money};
use mediaplan_core::{PlanError, PlanResult, RateModel};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Validated pricing inputs of a new line item.
struct Pricing {
    rate_model: RateModel,
    cpm_rate: Decimal,
    flat_rate: Decimal,
    impressions: u64,
    total_cost: Decimal,
}

impl Pricing {
    fn new(rate_model: RateModel, cpm_rate: &str, flat_rate: Option<&str>, impressions: u64) -> PlanResult<Self> {
        let cpm_rate = parse_amount("cpm_rate", cpm_rate)?;
        let flat_rate = match flat_rate {
            Some(raw) => parse_amount("flat_rate", raw)?,
            None => zero_money(),
        };
        let total_cost = line_item_cost(&rate_model, cpm_rate, impressions)?;
        Ok(Self {
            rate_model,
            cpm_rate,
            flat_rate,
            impressions,
            total_cost,
        })
    }
}

fn check_schedule(start: Option<NaiveDate>, end: Option<NaiveDate>) -> PlanResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(PlanError::validation(format!(
            "end date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}

fn check_name(name: &str) -> PlanResult<()> {
    if name.trim().is_empty() {
        return Err(PlanError::validation("line_item_name must not be empty"));
    }
    Ok(())
}

impl MediaPlanner {
    pub fn get_line_item(&self, id: i64) -> PlanResult<LineItem> {
        self.store.line_items.get(id)
    }

    /// Line items of a version ordered by `(sort_order, id)`.
    pub fn list_line_items(&self, version_id: i64) -> PlanResult<Vec<LineItem>> {
        Ok(self.plan_snapshot(version_id)?.line_items)
    }

    pub fn create_line_item(&self, req: CreateLineItemRequest) -> PlanResult<LineItem> {
        check_name(&req.line_item_name)?;
        check_schedule(req.start_date, req.end_date)?;
        let pricing = Pricing::new(req.rate_model, &req.cpm_rate, req.flat_rate.as_deref(), req.impressions)?;

        let _refs = self.product_refs_shared();
        self.store.products.get(req.product_id)?;

        let version_id = req.plan_version_id;
        let _guard = self.lock_version(version_id);
        self.store.versions.get(version_id)?;

        let now = Utc::now();
        let item = self.store.line_items.create(|id| LineItem {
            id,
            plan_version_id: version_id,
            product_id: req.product_id,
            line_item_name: req.line_item_name,
            site: req.site,
            placement_name: req.placement_name,
            targeting_details: req.targeting_details,
            ad_sizes: req.ad_sizes,
            start_date: req.start_date,
            end_date: req.end_date,
            rate_model: pricing.rate_model,
            cpm_rate: pricing.cpm_rate,
            flat_rate: pricing.flat_rate,
            impressions: pricing.impressions,
            total_cost: pricing.total_cost,
            sort_order: req.sort_order,
            created_at: now,
            updated_at: now,
        });
        self.recompute_locked(version_id);
        info!(line_item_id = item.id, version_id, total_cost = %item.total_cost, "Line item created");
        Ok(item)
    }

    /// Add a catalog product to a version, seeding display fields from the
    /// product. A package product yields one line item per placement.
    pub fn add_product_to_plan(
        &self,
        version_id: i64,
        product_id: i64,
        req: AddProductRequest,
    ) -> PlanResult<Vec<LineItem>> {
        check_schedule(req.start_date, req.end_date)?;
        let _refs = self.product_refs_shared();
        let product = self.store.products.get(product_id)?;
        let rate_model = req.rate_model.clone().unwrap_or_else(|| product.pricing_model.clone());
        let pricing = Pricing::new(rate_model, &req.rate, None, req.units)?;
        let drafts = self.product_drafts(&product, &req)?;

        let _guard = self.lock_version(version_id);
        self.store.versions.get(version_id)?;

        let now = Utc::now();
        let items: Vec<LineItem> = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                self.store.line_items.create(|id| LineItem {
                    id,
                    plan_version_id: version_id,
                    product_id,
                    line_item_name: draft.line_item_name,
                    site: draft.site,
                    placement_name: draft.placement_name,
                    targeting_details: draft.targeting_details,
                    ad_sizes: draft.ad_sizes,
                    start_date: req.start_date,
                    end_date: req.end_date,
                    rate_model: pricing.rate_model.clone(),
                    cpm_rate: pricing.cpm_rate,
                    flat_rate: pricing.flat_rate,
                    impressions: pricing.impressions,
                    total_cost: pricing.total_cost,
                    sort_order: index as i32,
                    created_at: now,
                    updated_at: now,
                })
            })
            .collect();
        self.recompute_locked(version_id);
        info!(version_id, product_id, line_items = items.len(), "Product added to plan");
        Ok(items)
    }

    /// Field-level edit. The cost is re-derived when rate, units, or rate
    /// model change.
    pub fn update_line_item(&self, id: i64, req: UpdateLineItemRequest) -> PlanResult<LineItem> {
        let version_id = self.store.line_items.get(id)?.plan_version_id;
        let _guard = self.lock_version(version_id);

        let mut item = self.store.line_items.get(id)?;
        let touches_cost = req.touches_cost();
        if let Some(name) = req.line_item_name {
            check_name(&name)?;
            item.line_item_name = name;
        }
        if let Some(site) = req.site {
            item.site = site;
        }
        if let Some(placement_name) = req.placement_name {
            item.placement_name = placement_name;
        }
        if let Some(targeting_details) = req.targeting_details {
            item.targeting_details = targeting_details;
        }
        if let Some(ad_sizes) = req.ad_sizes {
            item.ad_sizes = ad_sizes;
        }
        if let Some(start_date) = req.start_date {
            item.start_date = start_date;
        }
        if let Some(end_date) = req.end_date {
            item.end_date = end_date;
        }
        check_schedule(item.start_date, item.end_date)?;
        if let Some(rate_model) = req.rate_model {
            item.rate_model = rate_model;
        }
        if let Some(raw) = req.cpm_rate.as_deref() {
            item.cpm_rate = parse_amount("cpm_rate", raw)?;
        }
        if let Some(raw) = req.flat_rate.as_deref() {
            item.flat_rate = parse_amount("flat_rate", raw)?;
        }
        if let Some(impressions) = req.impressions {
            item.impressions = impressions;
        }
        if let Some(sort_order) = req.sort_order {
            item.sort_order = sort_order;
        }
        if touches_cost {
            item.total_cost = line_item_cost(&item.rate_model, item.cpm_rate, item.impressions)?;
        }
        item.updated_at = Utc::now();

        let item = self.store.line_items.replace(item)?;
        self.recompute_locked(version_id);
        info!(line_item_id = id, version_id, total_cost = %item.total_cost, "Line item updated");
        Ok(item)
    }

    pub fn delete_line_item(&self, id: i64) -> PlanResult<LineItem> {
        let version_id = self.store.line_items.get(id)?.plan_version_id;
        let _guard = self.lock_version(version_id);
        let item = self.store.line_items.remove(id)?;
        self.recompute_locked(version_id);
        info!(line_item_id = id, version_id, "Line item deleted");
        Ok(item)
    }

    /// Copy a line item within its version, suffixing name and placement.
    pub fn duplicate_line_item(&self, id: i64) -> PlanResult<LineItem> {
        let _refs = self.product_refs_shared();
        let version_id = self.store.line_items.get(id)?.plan_version_id;
        let _guard = self.lock_version(version_id);
        let source = self.store.line_items.get(id)?;

        let suffix = &self.config.copy_suffix;
        let placement_name = if source.placement_name.is_empty() {
            format!("{}{suffix}", source.line_item_name)
        } else {
            format!("{}{suffix}", source.placement_name)
        };
        let now = Utc::now();
        let copy = self.store.line_items.create(|new_id| LineItem {
            id: new_id,
            line_item_name: format!("{}{suffix}", source.line_item_name),
            placement_name,
            created_at: now,
            updated_at: now,
            ..source.clone()
        });
        self.recompute_locked(version_id);
        info!(line_item_id = copy.id, source_line_item_id = id, version_id, "Line item duplicated");
        Ok(copy)
    }

    fn product_drafts(&self, product: &Product, req: &AddProductRequest) -> PlanResult<Vec<LineItemDraft>> {
        let site = req.site.clone().unwrap_or_else(|| self.config.default_site.clone());
        if !product.is_package {
            if req.placements.is_some() {
                return Err(PlanError::validation(format!(
                    "product {} is not a package; placements cannot be selected",
                    product.id
                )));
            }
            let placement_name = req
                .placement_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| product.placement_name.clone());
            return Ok(vec![LineItemDraft {
                line_item_name: placement_name.clone(),
                site,
                placement_name,
                targeting_details: product.targeting_details.clone(),
                ad_sizes: product.ad_sizes.clone(),
            }]);
        }

        let mut placements = catalog::package_placements(product)?;
        if placements.is_empty() {
            warn!(product_id = product.id, "Package product has no placements");
            return Err(PlanError::validation(format!(
                "package product {} has no placements",
                product.id
            )));
        }
        if let Some(selected) = &req.placements {
            if selected.is_empty() {
                return Err(PlanError::validation("select at least one package placement"));
            }
            if let Some(unknown) = selected.iter().find(|name| !placements.iter().any(|p| &p.name == *name)) {
                return Err(PlanError::validation(format!(
                    "package product {} has no placement named {unknown:?}",
                    product.id
                )));
            }
            placements.retain(|placement| selected.contains(&placement.name));
        }
        Ok(placements
            .into_iter()
            .map(|placement| LineItemDraft {
                line_item_name: format!("{} - {}", product.name, placement.name),
                site: site.clone(),
                targeting_details: if placement.targeting.is_empty() {
                    product.targeting_details.clone()
                } else {
                    placement.targeting
                },
                ad_sizes: placement.ad_sizes,
                placement_name: placement.name,
            })
            .collect())
    }
}

/// Display fields of a line item about to be created from a product.
struct LineItemDraft {
    line_item_name: String,
    site: String,
    placement_name: String,
    targeting_details: String,
    ad_sizes: String,
}
