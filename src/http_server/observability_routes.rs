//! Observability HTTP Routes
//!
//! Health check and a debug view of the static file layout.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::feed::LiveFeed;
use crate::telemetry::StateStore;

use super::errors::ApiError;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Debug introspection response
#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub working_dir: String,
    pub public_dir: String,
    pub index_path: String,
    pub index_exists: bool,
    pub history_capacity: usize,
    pub history_len: usize,
    pub active_subscribers: usize,
}

/// State for the debug endpoint
pub struct DebugState {
    pub public_dir: PathBuf,
    pub store: Arc<StateStore>,
    pub feed: LiveFeed,
}

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Debug introspection route
pub fn debug_routes(state: Arc<DebugState>) -> Router {
    Router::new()
        .route("/__debug", get(debug_handler))
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

async fn debug_handler(
    State(state): State<Arc<DebugState>>,
) -> Result<Json<DebugResponse>, ApiError> {
    let index_path = state.public_dir.join("index.html");
    let working_dir = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    Ok(Json(DebugResponse {
        working_dir,
        public_dir: state.public_dir.display().to_string(),
        index_path: index_path.display().to_string(),
        index_exists: index_path.is_file(),
        history_capacity: state.store.capacity(),
        history_len: state.store.len()?,
        active_subscribers: state.feed.active_subscribers(),
    }))
}
