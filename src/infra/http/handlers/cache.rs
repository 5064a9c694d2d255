//! Operational cache endpoints.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;
use tracing::info;

use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub cleared: usize,
}

/// Point-in-time snapshot of the response cache counters.
pub async fn cache_stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.cache.stats()))
}

/// Manual operational reset of the whole store.
pub async fn clear_cache(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let cleared = state.cache.clear();
    info!(target: "petalo::cache", cleared, "cache cleared by operator");
    Ok(Json(ClearResult { cleared }))
}
