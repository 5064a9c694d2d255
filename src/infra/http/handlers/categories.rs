//! Category handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::models::CategoryPayload;
use super::super::state::AppState;

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.categories.list_categories().await?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    match state.categories.find_category(id).await? {
        Some(category) => Ok(Json(category)),
        None => Err(ApiError::not_found("category not found")),
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.categories.create_category(payload.into()).await?;
    state.invalidator.category_changed();
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.categories.update_category(id, payload.into()).await?;
    state.invalidator.category_changed();
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.categories.delete_category(id).await?;
    state.invalidator.category_changed();
    Ok(StatusCode::NO_CONTENT)
}
