//! Product handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::application::repos::ProductQueryFilter;

use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::models::{ProductListQuery, ProductPayload};
use super::super::state::AppState;

/// How many products the storefront carousel shows at once.
const FEATURED_LIMIT: usize = 8;

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ProductQueryFilter {
        category: query.category,
        is_new: query.is_new,
        is_festival: query.is_festival,
    };
    let products = state.products.list_products(&filter).await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    match state.products.find_product(id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::not_found("product not found")),
    }
}

/// A fresh shuffle on every call; `no-store` keeps the response cache from
/// freezing one ordering for the TTL window.
pub async fn featured_products(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut products = state
        .products
        .list_products(&ProductQueryFilter::default())
        .await?;

    products.shuffle(&mut rand::thread_rng());
    products.truncate(FEATURED_LIMIT);

    let mut response = Json(products).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );
    Ok(response)
}

pub async fn create_product(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.products.create_product(payload.into()).await?;
    state.invalidator.product_changed();
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.products.update_product(id, payload.into()).await?;
    state.invalidator.product_changed();
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.products.delete_product(id).await?;
    state.invalidator.product_changed();
    Ok(StatusCode::NO_CONTENT)
}
