use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::Engine;
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

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
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

async fn create_car(app: &Router, make: &str, model: &str, price: f64) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/cars",
            json!({ "make": make, "model": model, "year": 2021, "sale_price": price }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    json["data"]["id"].as_str().expect("car id").to_string()
}

#[tokio::test]
async fn test_create_car_defaults_to_available() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/api/cars",
            json!({ "make": "Toyota", "model": "Corolla", "year": 2021, "sale_price": 15000.0 }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "available");
    assert!(json["data"]["id"].as_str().expect("id").starts_with("car_"));
}

#[tokio::test]
async fn test_create_car_rejects_missing_make() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/api/cars",
            json!({ "make": "  ", "model": "Corolla", "year": 2021, "sale_price": 15000.0 }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_cars_filters_by_status() {
    let app = test_app();
    let car_id = create_car(&app, "Toyota", "Corolla", 15000.0).await;
    create_car(&app, "Mazda", "3", 18000.0).await;

    // Mark one sold.
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/cars/{car_id}"),
            json!({ "status": "sold" }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/cars?status=sold"))
        .await
        .expect("request");
    let json = json_body(response).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["id"], car_id);

    let response = app
        .oneshot(get("/api/cars?status=leased"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_car_is_404() {
    let app = test_app();
    let response = app
        .oneshot(get("/api/cars/car_0000000000"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_delete_car_returns_204() {
    let app = test_app();
    let car_id = create_car(&app, "Toyota", "Corolla", 15000.0).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/cars/{car_id}"))
        .body(Body::empty())
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/api/cars/{car_id}")))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_upload_sets_image_url() {
    let app = test_app();
    let car_id = create_car(&app, "Toyota", "Corolla", 15000.0).await;

    let data = base64::engine::general_purpose::STANDARD.encode(b"not-really-a-jpeg");
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/cars/{car_id}/image"),
            json!({ "data": data, "content_type": "image/jpeg" }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let url = json["data"]["image_url"].as_str().expect("url");
    assert_eq!(url, format!("memory://cars/{car_id}.jpg"));

    let response = app
        .oneshot(get(&format!("/api/cars/{car_id}")))
        .await
        .expect("request");
    let json = json_body(response).await;
    assert_eq!(json["data"]["image_url"], url);
}

#[tokio::test]
async fn test_image_upload_rejects_unknown_content_type() {
    let app = test_app();
    let car_id = create_car(&app, "Toyota", "Corolla", 15000.0).await;

    let response = app
        .oneshot(post_json(
            &format!("/api/cars/{car_id}/image"),
            json!({ "data": "aGVsbG8=", "content_type": "application/pdf" }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
