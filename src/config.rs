use std::path::PathBuf;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub analyzer_url: String,
    pub base_url: String,
    pub database_path: PathBuf,
    pub cors_origins: Option<String>,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let port: u16 = match std::env::var("PORT") {
            Ok(p) => p.parse().unwrap_or_else(|_| {
                warn!("[clauselens] Invalid PORT value, defaulting to 3000");
                3000
            }),
            Err(_) => 3000,
        };

        let analyzer_url = std::env::var("ANALYZER_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let database_path = PathBuf::from(
            std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/clauselens.db".to_string()),
        );

        let cors_origins = std::env::var("CORS_ORIGINS").ok();

        let request_timeout_secs: u64 = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(v) => v.parse().unwrap_or_else(|_| {
                warn!("[clauselens] Invalid REQUEST_TIMEOUT_SECS value, defaulting to 120");
                120
            }),
            Err(_) => 120,
        };

        // Matches the analyzer's own 16 MiB document cap.
        let max_upload_bytes: usize = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(v) => v.parse().unwrap_or_else(|_| {
                warn!("[clauselens] Invalid MAX_UPLOAD_BYTES value, defaulting to 16 MiB");
                16 * 1024 * 1024
            }),
            Err(_) => 16 * 1024 * 1024,
        };

        Self {
            port,
            analyzer_url,
            base_url,
            database_path,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
        }
    }
}
