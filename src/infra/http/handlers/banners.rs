//! Banner handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::models::{BannerPayload, ReorderPayload};
use super::super::state::AppState;

/// Active banners only, for the storefront hero carousel.
pub async fn list_active_banners(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let banners = state.banners.list_banners(true).await?;
    Ok(Json(banners))
}

/// Every banner including inactive ones, for the admin panel.
pub async fn list_all_banners(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let banners = state.banners.list_banners(false).await?;
    Ok(Json(banners))
}

pub async fn get_banner(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    match state.banners.find_banner(id).await? {
        Some(banner) => Ok(Json(banner)),
        None => Err(ApiError::not_found("banner not found")),
    }
}

pub async fn create_banner(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<BannerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let banner = state.banners.create_banner(payload.into()).await?;
    state.invalidator.banner_changed();
    Ok((StatusCode::CREATED, Json(banner)))
}

pub async fn update_banner(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<BannerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let banner = state.banners.update_banner(id, payload.into()).await?;
    state.invalidator.banner_changed();
    Ok(Json(banner))
}

pub async fn delete_banner(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.banners.delete_banner(id).await?;
    state.invalidator.banner_changed();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_banners(
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
    state.banners.reorder_banners(&payload.ids).await?;
    state.invalidator.banner_changed();
    Ok(StatusCode::NO_CONTENT)
}
