use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use fleetboard_core::config::AuthMode;
use fleetboard_pdf::renderer::{HttpPdfRenderer, NullPdfRenderer, PdfRenderer};
use fleetboard_server::state::AppState;
use fleetboard_server::storage::LocalStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fleetboard=info".parse()?),
        )
        .json()
        .init();

    let cfg = fleetboard_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Ensure data directory exists before opening DuckDB.
    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/fleetboard.db", cfg.data_dir);

    // Open DuckDB — initialises schema and seeds the settings table.
    let db = fleetboard_duckdb::FleetDb::open(&db_path, &cfg.duckdb_memory_limit)?;

    match &cfg.auth_mode {
        AuthMode::Local => {
            db.ensure_jwt_secret().await?;
            info!("Auth enabled — bearer JWT required on /api");
        }
        AuthMode::None => {
            info!("Auth disabled (FLEETBOARD_AUTH=none) — all routes open");
        }
    }

    let renderer: Arc<dyn PdfRenderer> = match &cfg.pdf_service_url {
        Some(url) => {
            info!(pdf_service_url = %url, "PDF rendering via HTTP service");
            Arc::new(HttpPdfRenderer::new(url))
        }
        None => {
            tracing::warn!(
                "FLEETBOARD_PDF_SERVICE_URL not set — PDF routes return raw HTML bytes"
            );
            Arc::new(NullPdfRenderer)
        }
    };

    let storage = Arc::new(LocalStorage::new(&cfg.data_dir, &cfg.public_url));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let state = Arc::new(AppState::new(db, cfg.clone(), renderer, storage));
    let app = fleetboard_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "Fleetboard listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
