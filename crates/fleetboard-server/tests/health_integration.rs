use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
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

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

#[tokio::test]
async fn test_health_returns_200_when_db_reachable() {
    let db = FleetDb::open_in_memory().expect("in-memory DuckDB");
    let state = Arc::new(AppState::new(
        db,
        test_config(),
        Arc::new(NullPdfRenderer),
        Arc::new(MemoryStorage),
    ));
    let app = build_app(state);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
