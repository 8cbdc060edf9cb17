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
        auth_mode: AuthMode::Local,
        session_days: 7,
        // Low memory cost keeps Argon2 fast in tests.
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

async fn signup(app: &Router, email: &str) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            json!({
                "email": email,
                "password": "a-long-enough-password",
                "display_name": "Test Operator"
            }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn test_signup_returns_token_and_user() {
    let app = test_app();
    let json = signup(&app, "op@example.com").await;

    assert!(json["data"]["token"].as_str().is_some());
    assert_eq!(json["data"]["user"]["email"], "op@example.com");
    // The Argon2 hash must never leave the server.
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_rejects_weak_password() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/api/auth/signup",
            json!({
                "email": "op@example.com",
                "password": "short",
                "display_name": "Test Operator"
            }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let app = test_app();
    signup(&app, "op@example.com").await;

    let response = app
        .oneshot(post_json(
            "/api/auth/signup",
            json!({
                "email": "op@example.com",
                "password": "a-long-enough-password",
                "display_name": "Someone Else"
            }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = test_app();
    signup(&app, "op@example.com").await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": "op@example.com", "password": "not-the-password" }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_me_round_trip() {
    let app = test_app();
    signup(&app, "op@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": "op@example.com", "password": "a-long-enough-password" }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let login = json_body(response).await;
    let token = login["data"]["token"].as_str().expect("token").to_string();

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("build request");
    let response = app.oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["email"], "op@example.com");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/cars")
        .body(Body::empty())
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("GET")
        .uri("/api/cars")
        .header("authorization", "Bearer not-a-real-token")
        .body(Body::empty())
        .expect("build request");
    let response = app.oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
