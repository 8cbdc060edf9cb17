use std::sync::Arc;

use fleetboard_core::config::Config;
use fleetboard_duckdb::FleetDb;
use fleetboard_pdf::renderer::PdfRenderer;

use crate::storage::ObjectStorage;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// All fields are safe to clone cheaply — heavy resources are wrapped in
/// `Arc`, and the DuckDB backend holds its connection behind
/// `Arc<tokio::sync::Mutex<_>>` internally.
pub struct AppState {
    pub db: Arc<FleetDb>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// PDF renderer. The HTTP implementation when a rendering service is
    /// configured, the null implementation otherwise.
    pub renderer: Arc<dyn PdfRenderer>,

    /// Where uploaded images land. Local disk in self-hosted deployments.
    pub storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    pub fn new(
        db: FleetDb,
        config: Config,
        renderer: Arc<dyn PdfRenderer>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            renderer,
            storage,
        }
    }
}
