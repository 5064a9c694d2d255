//! Response cache middleware.
//!
//! Wraps the public read router: eligible GET responses are buffered and
//! replayed from the store until they expire or a write invalidates their
//! family. Everything else flows straight through to the handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use tracing::{debug, instrument, warn};

use super::config::CacheConfig;
use super::families::ResourceFamily;
use super::keys::canonical_key;
use super::store::{CachedResponse, ResponseCache};

/// Diagnostic header stamped on every response that passed through the
/// cache layer. Value is `hit` or `miss`.
pub const CACHE_STATUS_HEADER: &str = "x-petalo-cache";

/// Shared cache state for the middleware.
#[derive(Clone)]
pub struct CacheState {
    pub config: CacheConfig,
    pub store: Arc<ResponseCache>,
}

/// Middleware caching successful GET responses for registered resource
/// families.
///
/// Key derivation normalizes query-parameter order, so every spelling of
/// the same filter combination shares one entry. Only 200 responses without
/// `Set-Cookie` or `Cache-Control: no-store` are stored; handlers use
/// `no-store` to opt an endpoint out entirely.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(cache): State<CacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !cache.config.enabled {
        return next.run(request).await;
    }

    if request.method() != Method::GET {
        return next.run(request).await;
    }

    // A shared cache must not serve or store responses to authorized
    // requests (RFC 9111 §3.5); the admin surface stays out of the store.
    if request.headers().contains_key(header::AUTHORIZATION) {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let Some(family) = ResourceFamily::for_path(&path) else {
        return next.run(request).await;
    };

    let key = canonical_key(&path, request.uri().query());

    if let Some(cached) = cache.store.get(&key) {
        debug!(target: "petalo::cache", key = %key, outcome = "hit", "serving cached response");
        return build_response(cached, "hit");
    }

    debug!(target: "petalo::cache", key = %key, outcome = "miss", "executing handler");

    let response = next.run(request).await;

    if !should_store_response(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    match BodyExt::collect(body).await {
        Ok(collected) => {
            let bytes = collected.to_bytes();

            if bytes.len() <= cache.config.response_body_limit_bytes {
                let cached = CachedResponse {
                    status: parts.status.as_u16(),
                    headers: parts
                        .headers
                        .iter()
                        .filter_map(|(name, value)| {
                            value
                                .to_str()
                                .ok()
                                .map(|value| (name.to_string(), value.to_string()))
                        })
                        .collect(),
                    body: bytes.clone(),
                };
                cache
                    .store
                    .insert(key, cached, family.ttl(&cache.config));
            } else {
                debug!(
                    target: "petalo::cache",
                    key = %key,
                    body_bytes = bytes.len(),
                    "response exceeds body limit, not stored"
                );
            }

            let mut response = Response::from_parts(parts, Body::from(bytes));
            set_cache_status(&mut response, "miss");
            response
        }
        Err(error) => {
            warn!(
                target: "petalo::cache",
                key = %key,
                error = %error,
                "failed to buffer response body"
            );
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Whether a downstream response may enter the store.
///
/// Error responses are never cached (a transient failure must not be
/// replayed), nor are responses that set cookies or declare `no-store`.
pub fn should_store_response(response: &Response) -> bool {
    if response.status() != StatusCode::OK {
        return false;
    }

    if response.headers().contains_key(header::SET_COOKIE) {
        return false;
    }

    let declines_storage = response
        .headers()
        .get_all(header::CACHE_CONTROL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("no-store"));
    !declines_storage
}

/// Rebuild a response from stored data, stamped with the diagnostic header.
fn build_response(cached: CachedResponse, status_label: &'static str) -> Response {
    let mut builder = Response::builder().status(cached.status);

    for (name, value) in cached.headers {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            builder = builder.header(name, header_value);
        }
    }

    match builder.body(Body::from(cached.body)) {
        Ok(mut response) => {
            set_cache_status(&mut response, status_label);
            response
        }
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

fn set_cache_status(response: &mut Response, status_label: &'static str) {
    response.headers_mut().insert(
        CACHE_STATUS_HEADER,
        HeaderValue::from_static(status_label),
    );
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn ok_response() -> Response {
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("[]"))
            .expect("response should build")
    }

    #[test]
    fn stores_plain_ok_responses() {
        assert!(should_store_response(&ok_response()));
    }

    #[test]
    fn refuses_error_responses() {
        let response = Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Body::empty())
            .expect("response should build");
        assert!(!should_store_response(&response));

        let not_found = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty())
            .expect("response should build");
        assert!(!should_store_response(&not_found));
    }

    #[test]
    fn refuses_responses_that_set_cookies() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::SET_COOKIE, "session=abc")
            .body(Body::empty())
            .expect("response should build");
        assert!(!should_store_response(&response));
    }

    #[test]
    fn refuses_no_store_responses() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CACHE_CONTROL, "no-store")
            .body(Body::empty())
            .expect("response should build");
        assert!(!should_store_response(&response));
    }

    #[test]
    fn replay_preserves_status_and_headers() {
        let cached = CachedResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Bytes::from_static(b"[1,2,3]"),
        };

        let response = build_response(cached, "hit");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            response
                .headers()
                .get(CACHE_STATUS_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("hit")
        );
    }
}
