//! End-to-end behavior of the response cache middleware.
//!
//! Drives a small router through `tower::ServiceExt::oneshot` and counts
//! handler executions to prove what was served from the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use http_body_util::BodyExt;
use petalo::cache::{
    CACHE_STATUS_HEADER, CacheConfig, CacheState, ResponseCache, response_cache_layer,
};
use tower::ServiceExt;

const BODY_PREFIX: &str = "call-";

fn cache_state(config: CacheConfig) -> CacheState {
    CacheState {
        store: Arc::new(ResponseCache::new(&config)),
        config,
    }
}

/// Router whose `/products` handler returns a distinct body per execution.
fn counting_router(state: CacheState, calls: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/products",
            get(move || {
                let calls = Arc::clone(&calls);
                async move {
                    let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    format!("{BODY_PREFIX}{call}")
                }
            }),
        )
        .layer(middleware::from_fn_with_state(state, response_cache_layer))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

async fn body_string(response: Response) -> String {
    let bytes = BodyExt::collect(response.into_body())
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn cache_status(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CACHE_STATUS_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn second_read_is_served_without_invoking_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_router(cache_state(CacheConfig::default()), Arc::clone(&calls));

    let first = app
        .clone()
        .oneshot(get_request("/products"))
        .await
        .expect("router should respond");
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(cache_status(&first).as_deref(), Some("miss"));
    assert_eq!(body_string(first).await, "call-1");

    let second = app
        .clone()
        .oneshot(get_request("/products"))
        .await
        .expect("router should respond");
    assert_eq!(cache_status(&second).as_deref(), Some("hit"));
    assert_eq!(body_string(second).await, "call-1");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn query_permutations_share_one_cache_entry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_router(cache_state(CacheConfig::default()), Arc::clone(&calls));

    let first = app
        .clone()
        .oneshot(get_request("/products?category=mugs&is_new=true"))
        .await
        .expect("router should respond");
    let first_body = body_string(first).await;

    let second = app
        .clone()
        .oneshot(get_request("/products?is_new=true&category=mugs"))
        .await
        .expect("router should respond");
    assert_eq!(cache_status(&second).as_deref(), Some("hit"));
    assert_eq!(body_string(second).await, first_body);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn different_filters_get_distinct_entries() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_router(cache_state(CacheConfig::default()), Arc::clone(&calls));

    for uri in ["/products?category=mugs", "/products?category=vases"] {
        let response = app
            .clone()
            .oneshot(get_request(uri))
            .await
            .expect("router should respond");
        assert_eq!(cache_status(&response).as_deref(), Some("miss"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn expired_entries_are_recomputed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = CacheConfig {
        response_ttl_ms: 40,
        ..Default::default()
    };
    let app = counting_router(cache_state(config), Arc::clone(&calls));

    let first = app
        .clone()
        .oneshot(get_request("/products"))
        .await
        .expect("router should respond");
    assert_eq!(body_string(first).await, "call-1");

    tokio::time::sleep(Duration::from_millis(80)).await;

    let second = app
        .clone()
        .oneshot(get_request("/products"))
        .await
        .expect("router should respond");
    assert_eq!(cache_status(&second).as_deref(), Some("miss"));
    assert_eq!(body_string(second).await, "call-2");
}

#[tokio::test]
async fn invalidation_forces_a_refetch_on_the_next_read() {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = cache_state(CacheConfig::default());
    let store = Arc::clone(&state.store);
    let app = counting_router(state, Arc::clone(&calls));

    for uri in ["/products", "/products?category=mugs"] {
        let _ = app
            .clone()
            .oneshot(get_request(uri))
            .await
            .expect("router should respond");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let removed = store.invalidate_prefix("/products");
    assert_eq!(removed, 2);

    let after = app
        .clone()
        .oneshot(get_request("/products"))
        .await
        .expect("router should respond");
    assert_eq!(cache_status(&after).as_deref(), Some("miss"));
    assert_eq!(body_string(after).await, "call-3");
}

#[tokio::test]
async fn error_responses_are_never_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = Arc::clone(&calls);
    let app = Router::new()
        .route(
            "/products",
            get(move || {
                let calls = Arc::clone(&handler_calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }),
        )
        .layer(middleware::from_fn_with_state(
            cache_state(CacheConfig::default()),
            response_cache_layer,
        ));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get_request("/products"))
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cache_status(&response), None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn no_store_responses_are_never_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = Arc::clone(&calls);
    let app = Router::new()
        .route(
            "/products",
            get(move || {
                let calls = Arc::clone(&handler_calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let mut response = "shuffled".into_response();
                    response.headers_mut().insert(
                        header::CACHE_CONTROL,
                        HeaderValue::from_static("no-store"),
                    );
                    response
                }
            }),
        )
        .layer(middleware::from_fn_with_state(
            cache_state(CacheConfig::default()),
            response_cache_layer,
        ));

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get_request("/products"))
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(cache_status(&response), None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn authorized_requests_bypass_the_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_router(cache_state(CacheConfig::default()), Arc::clone(&calls));

    for _ in 0..2 {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/products")
            .header(header::AUTHORIZATION, "Bearer admin-secret")
            .body(Body::empty())
            .expect("request should build");
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        assert_eq!(cache_status(&response), None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unregistered_paths_bypass_the_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = Arc::clone(&calls);
    let app = Router::new()
        .route(
            "/healthz",
            get(move || {
                let calls = Arc::clone(&handler_calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    StatusCode::NO_CONTENT
                }
            }),
        )
        .layer(middleware::from_fn_with_state(
            cache_state(CacheConfig::default()),
            response_cache_layer,
        ));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get_request("/healthz"))
            .await
            .expect("router should respond");
        assert_eq!(cache_status(&response), None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn disabled_cache_passes_everything_through() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = CacheConfig {
        enabled: false,
        ..Default::default()
    };
    let app = counting_router(cache_state(config), Arc::clone(&calls));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get_request("/products"))
            .await
            .expect("router should respond");
        assert_eq!(cache_status(&response), None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn oversized_bodies_are_served_but_not_stored() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = Arc::clone(&calls);
    let config = CacheConfig {
        response_body_limit_bytes: 8,
        ..Default::default()
    };
    let app = Router::new()
        .route(
            "/products",
            get(move || {
                let calls = Arc::clone(&handler_calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    "a body comfortably over the eight byte cap"
                }
            }),
        )
        .layer(middleware::from_fn_with_state(
            cache_state(config),
            response_cache_layer,
        ));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get_request("/products"))
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(cache_status(&response).as_deref(), Some("miss"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
