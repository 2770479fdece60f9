//! Planning domain types: products, campaigns, plan versions, line items.

use chrono::{DateTime, NaiveDate, Utc};
use mediaplan_core::{CampaignStatus, ProductCategory, RateModel};
use rust_decimal::Decimal;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

// ─── Product ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: ProductCategory,
    /// Free text; may open with a `**notice**` segment.
    pub targeting_details: String,
    pub placement_name: String,
    /// Free text, optionally `Desktop: ...; Tablet: ...; Mobile: ...`.
    pub ad_sizes: String,
    pub pricing_model: RateModel,
    pub is_package: bool,
    /// JSON-encoded `[{name, adSizes, targeting}]` when `is_package` is set.
    pub package_placements: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One placement inside a package product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagePlacement {
    pub name: String,
    #[serde(default, alias = "ad_sizes")]
    pub ad_sizes: String,
    #[serde(default)]
    pub targeting: String,
}

// ─── Campaign (RFP response) ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub title: String,
    pub client_name: String,
    pub due_date: Option<NaiveDate>,
    pub campaign_start_date: Option<NaiveDate>,
    pub campaign_end_date: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── Plan Version ──────────────────────────────────────────────────────────

/// A numbered media plan for a campaign.
///
/// `total_budget`, `total_impressions` and `avg_cpm` are derived from the
/// version's line items and are only ever written by the rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanVersion {
    pub id: i64,
    pub campaign_id: i64,
    pub version_number: u32,
    pub title: String,
    pub total_budget: Decimal,
    pub total_impressions: u64,
    pub avg_cpm: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── Line Item ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub plan_version_id: i64,
    /// Weak reference; display fields below are a snapshot taken at creation.
    pub product_id: i64,
    pub line_item_name: String,
    pub site: String,
    pub placement_name: String,
    pub targeting_details: String,
    pub ad_sizes: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rate_model: RateModel,
    pub cpm_rate: Decimal,
    pub flat_rate: Decimal,
    /// Units the rate applies to: impressions, views, or clicks.
    pub impressions: u64,
    pub total_cost: Decimal,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── API Request types ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub targeting_details: String,
    pub placement_name: String,
    #[serde(default)]
    pub ad_sizes: String,
    #[serde(default)]
    pub pricing_model: RateModel,
    #[serde(default)]
    pub is_package: bool,
    #[serde(default)]
    pub package_placements: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<ProductCategory>,
    pub targeting_details: Option<String>,
    pub placement_name: Option<String>,
    pub ad_sizes: Option<String>,
    pub pricing_model: Option<RateModel>,
    pub is_package: Option<bool>,
    pub package_placements: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive match on name, category, or targeting details.
    pub search: Option<String>,
    /// `"All Categories"` or an empty value applies no category filter.
    #[serde(default, deserialize_with = "category_filter")]
    pub category: Option<ProductCategory>,
}

/// Label the catalog picker sends when no category is selected.
pub const ALL_CATEGORIES: &str = "All Categories";

fn category_filter<'de, D>(deserializer: D) -> Result<Option<ProductCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return Ok(None);
    }
    let value: serde::de::value::StrDeserializer<'_, D::Error> = raw.into_deserializer();
    ProductCategory::deserialize(value).map(Some)
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignRequest {
    pub title: String,
    pub client_name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub campaign_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub campaign_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCampaignRequest {
    pub title: Option<String>,
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub campaign_start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub campaign_end_date: Option<Option<NaiveDate>>,
    pub status: Option<CampaignStatus>,
}

/// Only the authored fields of a version are editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVersionRequest {
    pub title: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLineItemRequest {
    /// Taken from the route when posted under a plan version.
    #[serde(default)]
    pub plan_version_id: i64,
    pub product_id: i64,
    pub line_item_name: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub placement_name: String,
    #[serde(default)]
    pub targeting_details: String,
    #[serde(default)]
    pub ad_sizes: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub rate_model: RateModel,
    pub cpm_rate: String,
    #[serde(default)]
    pub flat_rate: Option<String>,
    pub impressions: u64,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLineItemRequest {
    pub line_item_name: Option<String>,
    pub site: Option<String>,
    pub placement_name: Option<String>,
    pub targeting_details: Option<String>,
    pub ad_sizes: Option<String>,
    /// `null` clears the date; absent leaves it unchanged.
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    pub rate_model: Option<RateModel>,
    pub cpm_rate: Option<String>,
    pub flat_rate: Option<String>,
    pub impressions: Option<u64>,
    pub sort_order: Option<i32>,
}

impl UpdateLineItemRequest {
    /// Whether the edit touches a field that feeds the cost calculation.
    pub fn touches_cost(&self) -> bool {
        self.cpm_rate.is_some() || self.impressions.is_some() || self.rate_model.is_some()
    }
}

/// Add a catalog product to a plan version.
#[derive(Debug, Clone, Deserialize)]
pub struct AddProductRequest {
    /// Defaults to the product's placement name.
    #[serde(default)]
    pub placement_name: Option<String>,
    /// Defaults to the configured site.
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Defaults to the product's pricing model.
    #[serde(default)]
    pub rate_model: Option<RateModel>,
    pub rate: String,
    pub units: u64,
    /// Package placements to add, by name. All of them when absent.
    #[serde(default)]
    pub placements: Option<Vec<String>>,
}
