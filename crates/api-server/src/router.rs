//! Planner API router: mounts catalog, campaign, plan version, and line item endpoints under /api.

use crate::handlers::{self, PlannerState};
use axum::routing::{get, post};
use axum::Router;
use mediaplan_planning::MediaPlanner;
use std::sync::Arc;

/// Build the planner router with all endpoints and `/health`.
pub fn planner_router(planner: Arc<MediaPlanner>) -> Router {
    let state = PlannerState::new(planner);

    Router::new()
        // Catalog
        .route("/api/products", get(handlers::list_products).post(handlers::create_product))
        .route("/api/products/{id}", get(handlers::get_product).put(handlers::update_product).delete(handlers::delete_product))
        .route("/api/categories", get(handlers::list_categories))
        // Campaigns
        .route("/api/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route("/api/campaigns/{id}", get(handlers::get_campaign).put(handlers::update_campaign).delete(handlers::delete_campaign))
        .route("/api/campaigns/{id}/plan-versions", get(handlers::list_versions).post(handlers::create_version))
        // Plan versions
        .route("/api/plan-versions/{id}", get(handlers::get_version).put(handlers::update_version).delete(handlers::delete_version))
        .route("/api/plan-versions/{id}/duplicate", post(handlers::duplicate_version))
        .route("/api/plan-versions/{id}/recompute", post(handlers::recompute_version))
        .route("/api/plan-versions/{id}/line-items", get(handlers::list_line_items).post(handlers::create_line_item))
        .route("/api/plan-versions/{id}/products/{product_id}", post(handlers::add_product_to_plan))
        // Line items
        .route("/api/line-items/{id}", get(handlers::get_line_item).put(handlers::update_line_item).delete(handlers::delete_line_item))
        .route("/api/line-items/{id}/duplicate", post(handlers::duplicate_line_item))
        // Operational
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
