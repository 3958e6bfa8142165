//! Data HTTP Routes
//!
//! Ingestion (`POST /data`) and the latest/history queries.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::telemetry::{IngestRequest, Reading, StateStore};

use super::auth::ApiKeyAuth;
use super::errors::ApiError;

// ==================
// Shared State
// ==================

/// State shared by the data handlers
pub struct DataState {
    pub store: Arc<StateStore>,
    pub auth: ApiKeyAuth,
}

impl DataState {
    pub fn new(store: Arc<StateStore>, auth: ApiKeyAuth) -> Self {
        Self { store, auth }
    }
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub ok: bool,
    pub latest: Option<Reading>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub ok: bool,
    pub count: usize,
    pub history: Vec<Reading>,
}

// ==================
// Data Routes
// ==================

/// Create data routes
pub fn data_routes(state: Arc<DataState>) -> Router {
    Router::new()
        .route("/data", post(ingest_handler))
        .route("/data/latest", get(latest_handler))
        .route("/data/history", get(history_handler))
        .with_state(state)
}

/// Store one reading. The key is checked before the body is looked at.
async fn ingest_handler(
    State(state): State<Arc<DataState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LatestResponse>, ApiError> {
    state.auth.check(&headers)?;

    let request = IngestRequest::from_slice(&body)?;
    let reading = state.store.ingest(request)?;
    debug!(sensor = %reading.sensor, value = reading.value, ts = reading.ts, "reading stored");

    Ok(Json(LatestResponse {
        ok: true,
        latest: Some(reading),
    }))
}

async fn latest_handler(
    State(state): State<Arc<DataState>>,
) -> Result<Json<LatestResponse>, ApiError> {
    let latest = state.store.latest()?;
    Ok(Json(LatestResponse { ok: true, latest }))
}

async fn history_handler(
    State(state): State<Arc<DataState>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let snapshot = state.store.history()?;
    Ok(Json(HistoryResponse {
        ok: true,
        count: snapshot.count,
        history: snapshot.history,
    }))
}
