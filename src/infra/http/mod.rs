pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use middleware::{AdminToken, RequireAdmin};
pub use state::AppState;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::cache::{CacheState, response_cache_layer};

/// Assemble the full storefront router.
///
/// The response cache wraps every route but gates itself: only
/// unauthorized GETs under a registered resource family are served from or
/// written to the store. Admin handlers enforce auth via [`RequireAdmin`].
pub fn build_router(state: AppState) -> Router {
    let cache_state = CacheState {
        config: state.cache_config.clone(),
        store: state.cache.clone(),
    };

    Router::new()
        .route("/healthz", get(health))
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/featured",
            get(handlers::products::featured_products),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/occasions",
            get(handlers::occasions::list_occasions).post(handlers::occasions::create_occasion),
        )
        .route(
            "/occasions/{id}",
            get(handlers::occasions::get_occasion)
                .put(handlers::occasions::update_occasion)
                .delete(handlers::occasions::delete_occasion),
        )
        .route(
            "/banners",
            get(handlers::banners::list_active_banners).post(handlers::banners::create_banner),
        )
        .route("/banners/all", get(handlers::banners::list_all_banners))
        .route("/banners/reorder", put(handlers::banners::reorder_banners))
        .route(
            "/banners/{id}",
            get(handlers::banners::get_banner)
                .put(handlers::banners::update_banner)
                .delete(handlers::banners::delete_banner),
        )
        .route(
            "/reels",
            get(handlers::reels::list_active_reels).post(handlers::reels::create_reel),
        )
        .route("/reels/all", get(handlers::reels::list_all_reels))
        .route("/reels/reorder", put(handlers::reels::reorder_reels))
        .route(
            "/reels/{id}",
            put(handlers::reels::update_reel).delete(handlers::reels::delete_reel),
        )
        .route("/cache/stats", get(handlers::cache::cache_stats))
        .route("/cache/clear", post(handlers::cache::clear_cache))
        .layer(axum_middleware::from_fn_with_state(
            cache_state,
            response_cache_layer,
        ))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
