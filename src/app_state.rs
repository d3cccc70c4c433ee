//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, World};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The shared entity store.
    pub world: Arc<World>,
    /// Active WebSocket connections eligible for broadcast.
    pub registry: Arc<ConnectionRegistry>,
}
