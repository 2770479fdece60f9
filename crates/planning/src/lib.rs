//! Media planning domain: product catalog, RFP campaigns, versioned media
//! plans, and the line-item cost and rollup rules that keep plan totals
//! consistent.
//!
//! All writes go through [`MediaPlanner`], which pairs every line item
//! mutation with a rollup of the owning plan version under that version's
//! lock.

pub mod campaigns;
pub mod catalog;
pub mod cost;
pub mod line_items;
pub mod models;
pub mod planner;
pub mod rollup;
pub mod seed;
pub mod store;
pub mod versions;

pub use cost::compute_total_cost;
pub use planner::MediaPlanner;
pub use rollup::{compute_totals, VersionTotals};
pub use store::{Entity, PlanStore, Table};
pub use versions::{PlanSnapshot, VersionDeletion};
