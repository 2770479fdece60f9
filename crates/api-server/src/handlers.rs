//! Axum REST handlers for the planner API.

use crate::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mediaplan_core::ProductCategory;
use mediaplan_planning::campaigns::CampaignDeletion;
use mediaplan_planning::models::*;
use mediaplan_planning::{MediaPlanner, PlanSnapshot, VersionDeletion};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared planner state.
#[derive(Clone)]
pub struct PlannerState {
    pub planner: Arc<MediaPlanner>,
    pub start_time: Instant,
}

impl PlannerState {
    pub fn new(planner: Arc<MediaPlanner>) -> Self {
        Self {
            planner,
            start_time: Instant::now(),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// GET /health
pub async fn health_check(State(state): State<PlannerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// ─── Products ──────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<PlannerState>,
    Query(filter): Query<ProductFilter>,
) -> Json<Vec<Product>> {
    Json(state.planner.list_products(&filter))
}

pub async fn get_product(State(state): State<PlannerState>, Path(id): Path<i64>) -> ApiResult<Json<Product>> {
    Ok(Json(state.planner.get_product(id)?))
}

pub async fn create_product(
    State(state): State<PlannerState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.planner.create_product(req)?;
    metrics::counter!("planner.products.created").increment(1);
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.planner.update_product(id, req)?))
}

pub async fn delete_product(State(state): State<PlannerState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.planner.delete_product(id)?;
    metrics::counter!("planner.products.deleted").increment(1);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(State(state): State<PlannerState>) -> Json<Vec<ProductCategory>> {
    Json(state.planner.categories())
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

pub async fn list_campaigns(State(state): State<PlannerState>) -> Json<Vec<Campaign>> {
    Json(state.planner.list_campaigns())
}

pub async fn get_campaign(State(state): State<PlannerState>, Path(id): Path<i64>) -> ApiResult<Json<Campaign>> {
    Ok(Json(state.planner.get_campaign(id)?))
}

pub async fn create_campaign(
    State(state): State<PlannerState>,
    Json(req): Json<CreateCampaignRequest>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    let campaign = state.planner.create_campaign(req)?;
    metrics::counter!("planner.campaigns.created").increment(1);
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCampaignRequest>,
) -> ApiResult<Json<Campaign>> {
    Ok(Json(state.planner.update_campaign(id, req)?))
}

pub async fn delete_campaign(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CampaignDeletion>> {
    let deletion = state.planner.delete_campaign(id)?;
    metrics::counter!("planner.campaigns.deleted").increment(1);
    Ok(Json(deletion))
}

// ─── Plan Versions ─────────────────────────────────────────────────────────

pub async fn list_versions(
    State(state): State<PlannerState>,
    Path(campaign_id): Path<i64>,
) -> ApiResult<Json<Vec<PlanVersion>>> {
    Ok(Json(state.planner.list_versions(campaign_id)?))
}

pub async fn create_version(
    State(state): State<PlannerState>,
    Path(campaign_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<PlanVersion>)> {
    let version = state.planner.create_version(campaign_id)?;
    metrics::counter!("planner.versions.created").increment(1);
    Ok((StatusCode::CREATED, Json(version)))
}

/// GET /api/plan-versions/{id}: the version with its line items.
pub async fn get_version(State(state): State<PlannerState>, Path(id): Path<i64>) -> ApiResult<Json<PlanSnapshot>> {
    Ok(Json(state.planner.plan_snapshot(id)?))
}

pub async fn update_version(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateVersionRequest>,
) -> ApiResult<Json<PlanVersion>> {
    Ok(Json(state.planner.update_version(id, req)?))
}

pub async fn delete_version(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<VersionDeletion>> {
    let deletion = state.planner.delete_version(id)?;
    metrics::counter!("planner.versions.deleted").increment(1);
    Ok(Json(deletion))
}

pub async fn duplicate_version(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<PlanVersion>)> {
    let version = state.planner.duplicate_version(id)?;
    metrics::counter!("planner.versions.duplicated").increment(1);
    Ok((StatusCode::CREATED, Json(version)))
}

/// POST /api/plan-versions/{id}/recompute: repair drifted totals.
pub async fn recompute_version(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PlanVersion>> {
    let version = state
        .planner
        .recompute_version_totals(id)?
        .ok_or(mediaplan_core::PlanError::not_found(mediaplan_core::EntityKind::PlanVersion, id))?;
    metrics::counter!("planner.versions.recomputed").increment(1);
    Ok(Json(version))
}

// ─── Line Items ────────────────────────────────────────────────────────────

pub async fn list_line_items(
    State(state): State<PlannerState>,
    Path(version_id): Path<i64>,
) -> ApiResult<Json<Vec<LineItem>>> {
    Ok(Json(state.planner.list_line_items(version_id)?))
}

/// POST /api/plan-versions/{id}/line-items. The path wins over any
/// `plan_version_id` in the body.
pub async fn create_line_item(
    State(state): State<PlannerState>,
    Path(version_id): Path<i64>,
    Json(mut req): Json<CreateLineItemRequest>,
) -> ApiResult<(StatusCode, Json<LineItem>)> {
    req.plan_version_id = version_id;
    let item = state.planner.create_line_item(req)?;
    metrics::counter!("planner.line_items.created").increment(1);
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn add_product_to_plan(
    State(state): State<PlannerState>,
    Path((version_id, product_id)): Path<(i64, i64)>,
    Json(req): Json<AddProductRequest>,
) -> ApiResult<(StatusCode, Json<Vec<LineItem>>)> {
    let items = state.planner.add_product_to_plan(version_id, product_id, req)?;
    metrics::counter!("planner.line_items.created").increment(items.len() as u64);
    Ok((StatusCode::CREATED, Json(items)))
}

pub async fn get_line_item(State(state): State<PlannerState>, Path(id): Path<i64>) -> ApiResult<Json<LineItem>> {
    Ok(Json(state.planner.get_line_item(id)?))
}

pub async fn update_line_item(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLineItemRequest>,
) -> ApiResult<Json<LineItem>> {
    let item = state.planner.update_line_item(id, req)?;
    metrics::counter!("planner.line_items.updated").increment(1);
    Ok(Json(item))
}

pub async fn delete_line_item(State(state): State<PlannerState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.planner.delete_line_item(id)?;
    metrics::counter!("planner.line_items.deleted").increment(1);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn duplicate_line_item(
    State(state): State<PlannerState>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<LineItem>)> {
    let item = state.planner.duplicate_line_item(id)?;
    metrics::counter!("planner.line_items.created").increment(1);
    Ok((StatusCode::CREATED, Json(item)))
}
