//! Process configuration, read from the environment at startup.

use derive_getters::Getters;
use tracing::info;

/// Runtime configuration: connection string, bind address, CORS origins and
/// log level, read from the environment.
#[derive(Debug, Clone, Getters)]
pub struct Config {
    database_url: String,
    bind_addr: String,
    cors_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from `.env` (if present) and the process
    /// environment, falling back to development defaults.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sessions.sqlite".to_string());
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();

        info!(
            database_url = %database_url,
            bind_addr = %bind_addr,
            cors_origin_count = cors_origins.len(),
            "configuration loaded"
        );

        Self {
            database_url,
            bind_addr,
            cors_origins,
        }
    }
}
