//! worldsync server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints, the `/subscribe`
//! WebSocket endpoint, and static asset serving.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use worldsync::api;
use worldsync::app_state::AppState;
use worldsync::config::ServerConfig;
use worldsync::domain::{ConnectionRegistry, World};
use worldsync::ws::BroadcastListener;
use worldsync::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting worldsync");

    // Build domain layer: the shared world, the connection registry, and
    // the one listener that wires mutations to broadcast.
    let world = Arc::new(World::new());
    let registry = Arc::new(ConnectionRegistry::new());
    world.add_listener(Arc::new(BroadcastListener::new(Arc::clone(&registry))));

    // Build application state
    let app_state = AppState { world, registry };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/subscribe", get(ws_handler))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
