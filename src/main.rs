use std::{process, sync::Arc};

use petalo::{
    application::error::AppError,
    application::repos::{BannersRepo, CategoriesRepo, OccasionsRepo, ProductsRepo, ReelsRepo},
    cache::{CacheConfig, CacheInvalidator, ResponseCache},
    config,
    infra::{
        db::MemoryCatalog,
        error::InfraError,
        http::{self, AdminToken, AppState},
        telemetry,
    },
};
use tokio::net::TcpListener;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let state = build_state(&settings);

    // Sweep timer bounds memory for families that stop receiving reads.
    let sweep_handle = if state.cache_config.enabled {
        let store = state.cache.clone();
        let period = state.cache_config.sweep_interval();
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // Skip the first immediate tick
            loop {
                interval.tick().await;
                store.sweep();
            }
        }))
    } else {
        None
    };

    let result = serve_http(&settings, state).await;

    if let Some(handle) = sweep_handle {
        handle.abort();
        let _ = handle.await;
    }

    result
}

fn build_state(settings: &config::Settings) -> AppState {
    let catalog = Arc::new(MemoryCatalog::new());
    let products: Arc<dyn ProductsRepo> = catalog.clone();
    let categories: Arc<dyn CategoriesRepo> = catalog.clone();
    let occasions: Arc<dyn OccasionsRepo> = catalog.clone();
    let banners: Arc<dyn BannersRepo> = catalog.clone();
    let reels: Arc<dyn ReelsRepo> = catalog;

    let cache_config = CacheConfig::from(&settings.cache);
    let cache = Arc::new(ResponseCache::new(&cache_config));
    let invalidator = Arc::new(CacheInvalidator::new(&cache_config, cache.clone()));

    AppState {
        products,
        categories,
        occasions,
        banners,
        reels,
        cache_config,
        cache,
        invalidator,
        admin_token: AdminToken::new(settings.auth.admin_token.clone()),
    }
}

async fn serve_http(settings: &config::Settings, state: AppState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(target = "petalo::server", addr = %settings.server.addr, "listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
