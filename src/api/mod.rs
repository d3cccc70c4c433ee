//! REST API layer: route handlers and router composition.
//!
//! All endpoints are mounted at the root path with no version prefix
//! (`/world`, `/entity/{key}`, `/clear`), matching what the browser
//! client calls.

pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
}
