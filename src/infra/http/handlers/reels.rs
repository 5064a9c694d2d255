//! Reel handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::models::{ReelPayload, ReorderPayload};
use super::super::state::AppState;

/// Active reels with their product embedded, for the storefront feed.
pub async fn list_active_reels(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let reels = state.reels.list_reels(true).await?;
    Ok(Json(reels))
}

/// Every reel including inactive ones, for the admin panel.
pub async fn list_all_reels(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let reels = state.reels.list_reels(false).await?;
    Ok(Json(reels))
}

pub async fn create_reel(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<ReelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let reel = state.reels.create_reel(payload.into()).await?;
    state.invalidator.reel_changed();
    Ok((StatusCode::CREATED, Json(reel)))
}

pub async fn update_reel(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let reel = state.reels.update_reel(id, payload.into()).await?;
    state.invalidator.reel_changed();
    Ok(Json(reel))
}

pub async fn delete_reel(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.reels.delete_reel(id).await?;
    state.invalidator.reel_changed();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_reels(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<ReorderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.ids.is_empty() {
        return Err(ApiError::bad_request(
            "reorder requires at least one id",
            None,
        ));
    }
    state.reels.reorder_reels(&payload.ids).await?;
    state.invalidator.reel_changed();
    Ok(StatusCode::NO_CONTENT)
}
