//! HTTP entry point: loads configuration, runs migrations, and serves the
//! Request Facade over axum.

use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use strictly_grids::config::Config;
use strictly_grids::db::SessionStore;
use strictly_grids::facade::{build_router, AppState};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();

    info!(database_url = %config.database_url(), "running pending migrations");
    let mut conn = SqliteConnection::establish(config.database_url())?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("migration failed: {e}"))?;
    drop(conn);

    let store = SessionStore::new(config.database_url().clone())?;
    let state = AppState::new(store);

    let cors = if config.cors_origins().is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = config
            .cors_origins()
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = build_router(state, cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
