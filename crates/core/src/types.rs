use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted entity types, used for error reporting and store bookkeeping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Campaign,
    PlanVersion,
    LineItem,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Product => "product",
            EntityKind::Campaign => "campaign",
            EntityKind::PlanVersion => "plan version",
            EntityKind::LineItem => "line item",
        };
        f.write_str(name)
    }
}

/// Pricing model of a line item.
///
/// Unknown labels are kept verbatim so they round-trip through the API;
/// cost calculation treats them like CPM.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RateModel {
    /// Cost per thousand impressions.
    Cpm,
    /// Dynamic CPM.
    Dcpm,
    /// Cost per completed view.
    Cpcv,
    /// Cost per click.
    Cpc,
    Other(String),
}

impl RateModel {
    pub fn as_str(&self) -> &str {
        match self {
            RateModel::Cpm => "CPM",
            RateModel::Dcpm => "dCPM",
            RateModel::Cpcv => "CPCV",
            RateModel::Cpc => "CPC",
            RateModel::Other(label) => label,
        }
    }

    /// Whether the rate is quoted per thousand units.
    pub fn is_per_mille(&self) -> bool {
        !matches!(self, RateModel::Cpcv | RateModel::Cpc)
    }
}

impl Default for RateModel {
    fn default() -> Self {
        RateModel::Cpm
    }
}

impl From<String> for RateModel {
    fn from(label: String) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "CPM" => RateModel::Cpm,
            "DCPM" => RateModel::Dcpm,
            "CPCV" => RateModel::Cpcv,
            "CPC" => RateModel::Cpc,
            _ => RateModel::Other(label),
        }
    }
}

impl From<&str> for RateModel {
    fn from(label: &str) -> Self {
        RateModel::from(label.to_string())
    }
}

impl From<RateModel> for String {
    fn from(model: RateModel) -> Self {
        match model {
            RateModel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product catalog category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductCategory {
    Display,
    Video,
    Audio,
    Social,
    YouTube,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Display => "Display",
            ProductCategory::Video => "Video",
            ProductCategory::Audio => "Audio",
            ProductCategory::Social => "Social",
            ProductCategory::YouTube => "YouTube",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an RFP response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    InProgress,
    Submitted,
    Won,
    Lost,
}
