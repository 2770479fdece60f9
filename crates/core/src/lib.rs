pub mod config;
pub mod error;
pub mod money;
pub mod types;

pub use config::AppConfig;
pub use error::{PlanError, PlanResult};
pub use types::{CampaignStatus, EntityKind, ProductCategory, RateModel};
