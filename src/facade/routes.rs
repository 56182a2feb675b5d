//! Axum route table.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::engine::SessionEngine;
use crate::facade::handlers;
use crate::query::QueryService;

/// Shared application state injected into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) engine: SessionEngine,
    pub(crate) query: QueryService,
    pub(crate) store: crate::db::SessionStore,
}

impl AppState {
    /// Builds the shared state from a store, deriving the engine and query
    /// service from it.
    pub fn new(store: crate::db::SessionStore) -> Self {
        Self {
            engine: SessionEngine::new(store.clone()),
            query: QueryService::new(store.clone()),
            store,
        }
    }
}

/// Builds the full router, with CORS and request tracing layered on top.
/// Origins come from [`crate::config::Config`].
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/users", post(handlers::create_user))
        .route("/sessions", post(handlers::create_session).get(handlers::list_sessions))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}/join", post(handlers::join_session))
        .route("/sessions/{id}/move", post(handlers::submit_move))
        .route("/leaderboard", get(handlers::leaderboard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
