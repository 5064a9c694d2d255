//! Cache key derivation.
//!
//! A cached response is identified by the literal request path plus its
//! query string re-serialized with parameters in sorted order, so that
//! logically identical requests share one entry no matter how the client
//! ordered its parameters. Keeping the path literal (rather than hashing
//! the whole URL) is what makes prefix invalidation reach every query
//! variant of a resource family.

use std::borrow::Cow;

use url::form_urlencoded;

/// Derive the canonical cache key for a request.
///
/// `query` is the raw query string as reported by the URI (no leading `?`).
pub fn canonical_key(path: &str, query: Option<&str>) -> String {
    let query = query.unwrap_or("");
    if query.is_empty() {
        return path.to_string();
    }

    let mut pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> =
        form_urlencoded::parse(query.as_bytes()).collect();
    // Sort by name, then value, so repeated parameters stay deterministic.
    pairs.sort();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in &pairs {
        serializer.append_pair(name, value);
    }
    let canonical = serializer.finish();

    if canonical.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{canonical}")
    }
}
