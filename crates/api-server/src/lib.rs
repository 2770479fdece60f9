//! REST API for the media planner.
//!
//! Thin axum handlers over [`mediaplan_planning::MediaPlanner`]; all
//! invariants live in the planning crate.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::PlannerState;
pub use router::planner_router;
pub use server::ApiServer;
