//! HTTP surface: axum routes, DTOs, and the engine-error → HTTP-status
//! mapping. Everything upstream of this module is transport-agnostic and
//! framework-free.

mod dto;
mod extract;
mod handlers;
mod response;
mod routes;

pub use routes::{build_router, AppState};
