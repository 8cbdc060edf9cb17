#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    pub auth_mode: AuthMode,
    pub session_days: u32,
    pub argon2_memory_kb: u32,
    pub cors_origins: Vec<String>,
    pub duckdb_memory_limit: String,
    /// Base URL of the headless-browser PDF rendering service.
    /// When unset, PDF routes fall back to the null renderer (raw HTML bytes).
    pub pdf_service_url: Option<String>,
    pub public_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    None,
    Local,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("FLEETBOARD_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("FLEETBOARD_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string()),
            auth_mode: {
                let raw =
                    std::env::var("FLEETBOARD_AUTH").unwrap_or_else(|_| "local".to_string());
                match raw.as_str() {
                    "none" => AuthMode::None,
                    _ => AuthMode::Local,
                }
            },
            session_days: std::env::var("FLEETBOARD_SESSION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            argon2_memory_kb: std::env::var("FLEETBOARD_ARGON2_MEMORY_KB")
                .unwrap_or_else(|_| "65536".to_string())
                .parse()
                .unwrap_or(65536),
            cors_origins: std::env::var("FLEETBOARD_CORS_ORIGINS")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
            duckdb_memory_limit: std::env::var("FLEETBOARD_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
            pdf_service_url: std::env::var("FLEETBOARD_PDF_SERVICE_URL").ok(),
            public_url: std::env::var("FLEETBOARD_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}
