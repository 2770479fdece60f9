//! End-to-end tests of the planner REST API through the axum router.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mediaplan_api::planner_router;
use mediaplan_planning::MediaPlanner;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    planner_router(Arc::new(MediaPlanner::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_product(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": name,
            "category": "Display",
            "targeting_details": "Sigma Audiences",
            "placement_name": format!("{name}_Package"),
            "ad_sizes": "300x250, 728x90",
            "pricing_model": "dCPM"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// Creates a campaign with its first version and returns (campaign_id, version_id).
async fn campaign_with_version(app: &Router) -> (i64, i64) {
    let (status, campaign) = send(
        app,
        Method::POST,
        "/api/campaigns",
        Some(json!({"title": "Q4 Brand Campaign", "client_name": "Global Tech Company"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let campaign_id = campaign["id"].as_i64().unwrap();

    let (status, version) = send(app, Method::POST, &format!("/api/campaigns/{campaign_id}/plan-versions"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    (campaign_id, version["id"].as_i64().unwrap())
}

async fn add_line_item(app: &Router, version_id: i64, product_id: i64, rate: &str, impressions: u64) -> Value {
    let (status, item) = send(
        app,
        Method::POST,
        &format!("/api/plan-versions/{version_id}/line-items"),
        Some(json!({
            "product_id": product_id,
            "line_item_name": "Standard Display",
            "site": "MiQ",
            "rate_model": "dCPM",
            "cpm_rate": rate,
            "impressions": impressions
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {item}");
    item
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn line_item_create_rolls_up_into_version() {
    let app = app();
    let product_id = create_product(&app, "Standard Display").await;
    let (_, version_id) = campaign_with_version(&app).await;

    let item = add_line_item(&app, version_id, product_id, "12.50", 2_000_000).await;
    assert_eq!(item["total_cost"], "25000.00");
    assert_eq!(item["plan_version_id"].as_i64(), Some(version_id));

    let (status, snapshot) = send(&app, Method::GET, &format!("/api/plan-versions/{version_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["version"]["total_budget"], "25000.00");
    assert_eq!(snapshot["version"]["total_impressions"], 2_000_000);
    assert_eq!(snapshot["version"]["avg_cpm"], "12.50");
    assert_eq!(snapshot["line_items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_and_delete_line_item_keep_totals_in_sync() {
    let app = app();
    let product_id = create_product(&app, "Standard Display").await;
    let (_, version_id) = campaign_with_version(&app).await;
    let first = add_line_item(&app, version_id, product_id, "10", 1_000_000).await;
    add_line_item(&app, version_id, product_id, "20", 1_000_000).await;

    let first_id = first["id"].as_i64().unwrap();
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/line-items/{first_id}"),
        Some(json!({"impressions": 3_000_000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["total_cost"], "30000.00");

    let (_, snapshot) = send(&app, Method::GET, &format!("/api/plan-versions/{version_id}"), None).await;
    assert_eq!(snapshot["version"]["total_budget"], "50000.00");
    assert_eq!(snapshot["version"]["total_impressions"], 4_000_000);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/line-items/{first_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, snapshot) = send(&app, Method::GET, &format!("/api/plan-versions/{version_id}"), None).await;
    assert_eq!(snapshot["version"]["total_budget"], "20000.00");
    assert_eq!(snapshot["version"]["avg_cpm"], "20.00");
}

#[tokio::test]
async fn invalid_rate_is_rejected_without_writing() {
    let app = app();
    let product_id = create_product(&app, "Standard Display").await;
    let (_, version_id) = campaign_with_version(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/plan-versions/{version_id}/line-items"),
        Some(json!({
            "product_id": product_id,
            "line_item_name": "Broken",
            "cpm_rate": "twelve",
            "impressions": 1000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (_, items) = send(&app, Method::GET, &format!("/api/plan-versions/{version_id}/line-items"), None).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = app();
    for uri in ["/api/products/42", "/api/campaigns/42", "/api/plan-versions/42", "/api/line-items/42"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "not_found");
    }
    let (status, _) = send(&app, Method::DELETE, "/api/line-items/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_version_copies_items_and_numbers_sequentially() {
    let app = app();
    let product_id = create_product(&app, "Standard Display").await;
    let (campaign_id, version_id) = campaign_with_version(&app).await;
    add_line_item(&app, version_id, product_id, "12.50", 2_000_000).await;
    add_line_item(&app, version_id, product_id, "9", 500_000).await;

    let (status, copy) = send(&app, Method::POST, &format!("/api/plan-versions/{version_id}/duplicate"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["version_number"], 2);
    assert_eq!(copy["title"], "Version 1 (Copy)");
    assert_eq!(copy["total_budget"], "29500.00");

    let copy_id = copy["id"].as_i64().unwrap();
    let (_, items) = send(&app, Method::GET, &format!("/api/plan-versions/{copy_id}/line-items"), None).await;
    assert_eq!(items.as_array().unwrap().len(), 2);

    let (_, versions) = send(&app, Method::GET, &format!("/api/campaigns/{campaign_id}/plan-versions"), None).await;
    assert_eq!(versions.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_version_returns_fallback() {
    let app = app();
    let (_, first) = campaign_with_version(&app).await;
    let (status, copy) = send(&app, Method::POST, &format!("/api/plan-versions/{first}/duplicate"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let copy_id = copy["id"].as_i64().unwrap();

    let (status, deletion) = send(&app, Method::DELETE, &format!("/api/plan-versions/{copy_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deletion["deleted_version_id"].as_i64(), Some(copy_id));
    assert_eq!(deletion["fallback_version_id"].as_i64(), Some(first));
}

#[tokio::test]
async fn referenced_product_cannot_be_deleted() {
    let app = app();
    let product_id = create_product(&app, "Standard Display").await;
    let (_, version_id) = campaign_with_version(&app).await;
    add_line_item(&app, version_id, product_id, "12.50", 1000).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn add_product_uses_catalog_defaults() {
    let app = app();
    let product_id = create_product(&app, "Online Video").await;
    let (_, version_id) = campaign_with_version(&app).await;

    let (status, items) = send(
        &app,
        Method::POST,
        &format!("/api/plan-versions/{version_id}/products/{product_id}"),
        Some(json!({"rate": "20", "units": 250000})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["placement_name"], "Online Video_Package");
    assert_eq!(items[0]["site"], "MiQ");
    assert_eq!(items[0]["total_cost"], "5000.00");
}

#[tokio::test]
async fn product_search_filters_catalog() {
    let app = app();
    create_product(&app, "Standard Display").await;
    create_product(&app, "High Impact").await;

    let (status, body) = send(&app, Method::GET, "/api/products?search=impact", None).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "High Impact");

    let (_, categories) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(categories, json!(["Display"]));
}

#[tokio::test]
async fn all_categories_filter_lists_whole_catalog() {
    let app = app();
    create_product(&app, "Standard Display").await;
    create_product(&app, "High Impact").await;

    let (status, body) = send(&app, Method::GET, "/api/products?category=All%20Categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}
