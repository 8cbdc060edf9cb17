use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use fleetboard_core::config::{AuthMode, Config};
use fleetboard_duckdb::FleetDb;
use fleetboard_pdf::renderer::NullPdfRenderer;
use fleetboard_server::app::build_app;
use fleetboard_server::state::AppState;
use fleetboard_server::storage::MemoryStorage;

fn test_config() -> Config {
    Config {
        port: 0,
        data_dir: "/tmp/fleetboard-test".to_string(),
        auth_mode: AuthMode::None,
        session_days: 7,
        argon2_memory_kb: 8192,
        cors_origins: vec![],
        duckdb_memory_limit: "256MB".to_string(),
        pdf_service_url: None,
        public_url: "http://localhost:3000".to_string(),
    }
}

fn test_app() -> Router {
    let db = FleetDb::open_in_memory().expect("in-memory DuckDB");
    let state = Arc::new(AppState::new(
        db,
        test_config(),
        Arc::new(NullPdfRenderer),
        Arc::new(MemoryStorage),
    ));
    build_app(state)
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

async fn created_id(app: &Router, uri: &str, body: Value) -> String {
    let response = app.clone().oneshot(post_json(uri, body)).await.expect("request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    json["data"]["id"].as_str().expect("id").to_string()
}

/// Seed one customer, two cars, and one completed sale deal. Everything
/// is created "now", so it all lands in the current window for any
/// granularity.
async fn seed(app: &Router) {
    let customer_id = created_id(app, "/api/customers", json!({ "name": "Dana Levi" })).await;
    let car_id = created_id(
        app,
        "/api/cars",
        json!({ "make": "Toyota", "model": "Corolla", "year": 2021, "sale_price": 15000.0 }),
    )
    .await;
    created_id(
        app,
        "/api/cars",
        json!({ "make": "Mazda", "model": "3", "year": 2022, "sale_price": 18000.0 }),
    )
    .await;
    let deal_id = created_id(
        app,
        "/api/deals",
        json!({ "kind": "sale", "customer_id": customer_id, "car_id": car_id, "amount": 15000.0 }),
    )
    .await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/deals/{deal_id}/status"),
            json!({ "status": "completed" }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_month_dashboard_counts_fresh_rows_in_current_window() {
    let app = test_app();
    seed(&app).await;

    let response = app
        .oneshot(get("/api/dashboard?granularity=month"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["granularity"], "month");
    assert_eq!(data["current"]["cars"], 2);
    assert_eq!(data["current"]["deals"], 1);
    assert_eq!(data["current"]["customers"], 1);
    // Completed sale revenue.
    assert_eq!(data["current"]["revenue"], 15000.0);
    // One car left available after the sale.
    assert_eq!(data["current"]["inventory_value"], 18000.0);
    // Nothing existed last month, so growth pins to 100.
    assert_eq!(data["cars_growth"], 100.0);
}

#[tokio::test]
async fn test_all_granularity_pins_growth_to_zero() {
    let app = test_app();
    seed(&app).await;

    let response = app
        .oneshot(get("/api/dashboard?granularity=all"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["granularity"], "all");
    // Unbounded windows: current and previous see the same rows.
    assert_eq!(data["current"]["cars"], data["previous"]["cars"]);
    assert_eq!(data["cars_growth"], 0.0);
    assert_eq!(data["deals_growth"], 0.0);
    assert_eq!(data["revenue_growth"], 0.0);
}

#[tokio::test]
async fn test_dashboard_defaults_to_month() {
    let app = test_app();

    let response = app.oneshot(get("/api/dashboard")).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["granularity"], "month");
}

#[tokio::test]
async fn test_dashboard_rejects_unknown_granularity() {
    let app = test_app();

    let response = app
        .oneshot(get("/api/dashboard?granularity=fortnight"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_monthly_series_has_six_buckets_with_current_month_last() {
    let app = test_app();
    seed(&app).await;

    let response = app
        .oneshot(get("/api/dashboard?granularity=month"))
        .await
        .expect("request");
    let json = json_body(response).await;

    let monthly_deals = json["data"]["monthly_deals"].as_array().expect("series");
    let monthly_cars = json["data"]["monthly_cars"].as_array().expect("series");
    assert_eq!(monthly_deals.len(), 6);
    assert_eq!(monthly_cars.len(), 6);

    // Everything was created just now, so only the newest bucket is filled.
    let last = &monthly_deals[5];
    assert_eq!(last["count"], 1);
    assert_eq!(last["amount"], 15000.0);
    for bucket in &monthly_deals[..5] {
        assert_eq!(bucket["count"], 0);
        assert_eq!(bucket["amount"], 0.0);
    }
    assert_eq!(monthly_cars[5]["count"], 2);
}

#[tokio::test]
async fn test_explore_shows_only_available_cars() {
    let app = test_app();
    seed(&app).await;

    let response = app.oneshot(get("/api/explore")).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let cars = json["data"]["featured_cars"].as_array().expect("cars");
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["make"], "Mazda");
}
