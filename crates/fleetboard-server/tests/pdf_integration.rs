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

/// The null renderer echoes the template HTML, so these tests can assert
/// on document content without a rendering service.
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

async fn text_body(response: axum::http::Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
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

async fn seed_sale_deal(app: &Router) -> String {
    let shop_id = created_id(
        app,
        "/api/shops",
        json!({ "name": "Main Branch", "address": "12 Herzl St, Haifa" }),
    )
    .await;
    let customer_id = created_id(
        app,
        "/api/customers",
        json!({ "name": "Dana Levi", "phone": "050-1234567" }),
    )
    .await;
    let car_id = created_id(
        app,
        "/api/cars",
        json!({ "make": "Toyota", "model": "Corolla", "year": 2021, "sale_price": 15000.0, "shop_id": shop_id }),
    )
    .await;
    created_id(
        app,
        "/api/deals",
        json!({ "kind": "sale", "customer_id": customer_id, "car_id": car_id, "amount": 15000.0 }),
    )
    .await
}

async fn seed_trip_deal(app: &Router) -> String {
    let customer_id = created_id(app, "/api/customers", json!({ "name": "Noa Mizrahi" })).await;
    let provider_id = created_id(
        app,
        "/api/providers",
        json!({ "name": "North Guides", "kind": "guide" }),
    )
    .await;
    created_id(
        app,
        "/api/deals",
        json!({
            "kind": "trip",
            "customer_id": customer_id,
            "provider_id": provider_id,
            "amount": 5400.0,
            "destination": "Eilat",
            "trip_date": "2024-04-20",
            "seats": 45
        }),
    )
    .await
}

#[tokio::test]
async fn test_contract_pdf_renders_the_sale() {
    let app = test_app();
    let deal_id = seed_sale_deal(&app).await;

    let response = app
        .oneshot(get(&format!("/api/deals/{deal_id}/contract.pdf")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().expect("header"),
        "application/pdf"
    );

    let body = text_body(response).await;
    assert!(body.contains("Vehicle Sale Contract"));
    assert!(body.contains("Dana Levi"));
    assert!(body.contains("Toyota Corolla"));
    assert!(body.contains("Main Branch"));
}

#[tokio::test]
async fn test_contract_pdf_honors_language() {
    let app = test_app();
    let deal_id = seed_sale_deal(&app).await;

    let response = app
        .oneshot(get(&format!("/api/deals/{deal_id}/contract.pdf?lang=he")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = text_body(response).await;
    assert!(body.contains(r#"dir="rtl""#));
    assert!(body.contains("חוזה מכירת רכב"));
}

#[tokio::test]
async fn test_contract_pdf_rejects_unknown_language() {
    let app = test_app();
    let deal_id = seed_sale_deal(&app).await;

    let response = app
        .oneshot(get(&format!("/api/deals/{deal_id}/contract.pdf?lang=fr")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contract_pdf_rejects_trip_deals() {
    let app = test_app();
    let deal_id = seed_trip_deal(&app).await;

    let response = app
        .oneshot(get(&format!("/api/deals/{deal_id}/contract.pdf")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary_pdf_renders_the_booking() {
    let app = test_app();
    let deal_id = seed_trip_deal(&app).await;

    let response = app
        .oneshot(get(&format!("/api/deals/{deal_id}/summary.pdf?lang=ar")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = text_body(response).await;
    assert!(body.contains(r#"dir="rtl""#));
    assert!(body.contains("ملخص حجز الرحلة"));
    assert!(body.contains("Noa Mizrahi"));
    assert!(body.contains("Eilat"));
    assert!(body.contains("North Guides"));
}

#[tokio::test]
async fn test_summary_pdf_rejects_sale_deals() {
    let app = test_app();
    let deal_id = seed_sale_deal(&app).await;

    let response = app
        .oneshot(get(&format!("/api/deals/{deal_id}/summary.pdf")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pdf_for_unknown_deal_is_404() {
    let app = test_app();

    let response = app
        .oneshot(get("/api/deals/deal_0000000000/contract.pdf"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
