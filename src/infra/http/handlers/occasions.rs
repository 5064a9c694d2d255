//! Occasion handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::models::OccasionPayload;
use super::super::state::AppState;

pub async fn list_occasions(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let occasions = state.occasions.list_occasions().await?;
    Ok(Json(occasions))
}

pub async fn get_occasion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    match state.occasions.find_occasion(id).await? {
        Some(occasion) => Ok(Json(occasion)),
        None => Err(ApiError::not_found("occasion not found")),
    }
}

pub async fn create_occasion(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<OccasionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let occasion = state.occasions.create_occasion(payload.into()).await?;
    state.invalidator.occasion_changed();
    Ok((StatusCode::CREATED, Json(occasion)))
}

pub async fn update_occasion(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<OccasionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let occasion = state.occasions.update_occasion(id, payload.into()).await?;
    state.invalidator.occasion_changed();
    Ok(Json(occasion))
}

pub async fn delete_occasion(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.occasions.delete_occasion(id).await?;
    state.invalidator.occasion_changed();
    Ok(StatusCode::NO_CONTENT)
}
