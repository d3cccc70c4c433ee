//! World endpoints: snapshot, entity lookup, entity update, clear.
//!
//! Thin stateless wrappers over the core operations of
//! [`crate::domain::World`]. Updates applied here flow through the same
//! listener path as WebSocket updates, so connected clients see REST writes
//! too. Clearing over REST wipes the world without notifying WebSocket
//! clients; only the WebSocket `"clear"` command broadcasts.

use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;

use crate::app_state::AppState;
use crate::domain::Attributes;
use crate::error::{ApiError, ErrorResponse};

/// `GET|POST /world` — Full world snapshot.
#[utoipa::path(
    get,
    path = "/world",
    tag = "World",
    summary = "Fetch the full world",
    description = "Returns every entity and its attribute map as one JSON object.",
    responses(
        (status = 200, description = "The complete entity mapping", body = serde_json::Value),
    )
)]
pub async fn get_world(State(state): State<AppState>) -> Json<HashMap<String, Attributes>> {
    Json(state.world.snapshot().await)
}

/// `GET /entity/{key}` — One entity's attribute map.
///
/// An absent entity reads as an empty object; there is no 404 here.
#[utoipa::path(
    get,
    path = "/entity/{key}",
    tag = "World",
    summary = "Fetch one entity",
    description = "Returns the entity's attribute map, or an empty object if the entity does not exist.",
    params(("key" = String, Path, description = "Entity key")),
    responses(
        (status = 200, description = "The entity's attribute map", body = serde_json::Value),
    )
)]
pub async fn get_entity(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<Attributes> {
    Json(state.world.get(&key).await)
}

/// `PUT /entity/{key}` — Replace the entity's attributes wholesale.
///
/// # Errors
///
/// Returns [`ApiError::InvalidBody`] if the body is not a JSON object.
#[utoipa::path(
    put,
    path = "/entity/{key}",
    tag = "World",
    summary = "Replace an entity",
    description = "Replaces the entity's entire attribute map with the request body and broadcasts the update to all WebSocket clients.",
    request_body = serde_json::Value,
    params(("key" = String, Path, description = "Entity key")),
    responses(
        (status = 200, description = "The stored attribute map", body = serde_json::Value),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
    )
)]
pub async fn replace_entity(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Result<Json<Attributes>, JsonRejection>,
) -> Result<Json<Attributes>, ApiError> {
    let Json(data) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    state.world.set_entity(&key, data).await;
    Ok(Json(state.world.get(&key).await))
}

/// `POST /entity/{key}` — Merge attributes into the entity.
///
/// Each key in the body is merge-set individually, so connected clients
/// observe one echo per changed attribute carrying the map as it grows.
///
/// # Errors
///
/// Returns [`ApiError::InvalidBody`] if the body is not a JSON object.
#[utoipa::path(
    post,
    path = "/entity/{key}",
    tag = "World",
    summary = "Merge attributes into an entity",
    description = "Merges the request body's keys into the entity's attribute map, creating the entity if absent, and broadcasts the result.",
    request_body = serde_json::Value,
    params(("key" = String, Path, description = "Entity key")),
    responses(
        (status = 200, description = "The resulting attribute map", body = serde_json::Value),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
    )
)]
pub async fn merge_entity(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Result<Json<Attributes>, JsonRejection>,
) -> Result<Json<Attributes>, ApiError> {
    let Json(data) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    for (attr, value) in data {
        state.world.update(&key, &attr, value).await;
    }
    Ok(Json(state.world.get(&key).await))
}

/// `GET|POST /clear` — Wipe the world.
///
/// Responds with the (now empty) snapshot. Does not broadcast: only the
/// WebSocket `"clear"` command notifies connected clients.
#[utoipa::path(
    post,
    path = "/clear",
    tag = "World",
    summary = "Clear the world",
    description = "Discards every entity and returns the resulting empty mapping.",
    responses(
        (status = 200, description = "The empty entity mapping", body = serde_json::Value),
    )
)]
pub async fn clear_world(State(state): State<AppState>) -> Json<HashMap<String, Attributes>> {
    state.world.clear().await;
    Json(state.world.snapshot().await)
}

/// World routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/world", get(get_world).post(get_world))
        .route(
            "/entity/{key}",
            get(get_entity).put(replace_entity).post(merge_entity),
        )
        .route("/clear", get(clear_world).post(clear_world))
}
