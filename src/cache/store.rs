//! Response cache storage.
//!
//! Holds buffered HTTP responses keyed by canonical request identity.
//! Expiry is enforced lazily at lookup time; a background sweep only
//! bounds memory for keys that stop receiving reads.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use bytes::Bytes;
use metrics::counter;
use serde::Serialize;
use tracing::debug;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write, rw_write_recovered};

const SOURCE: &str = "cache::store";

const METRIC_HIT: &str = "petalo_cache_hit_total";
const METRIC_MISS: &str = "petalo_cache_miss_total";
const METRIC_EVICT: &str = "petalo_cache_evict_total";
const METRIC_INVALIDATED: &str = "petalo_cache_invalidated_total";
const METRIC_SWEPT: &str = "petalo_cache_swept_total";

/// A buffered HTTP response ready to be replayed on a cache hit.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

struct CacheEntry {
    response: CachedResponse,
    created_at: Instant,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    fn approx_size_bytes(&self, key: &str) -> usize {
        let headers: usize = self
            .response
            .headers
            .iter()
            .map(|(name, value)| name.len() + value.len())
            .sum();
        key.len() + headers + self.response.body.len()
    }
}

/// Point-in-time cache statistics for the operational endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
    pub approx_size_bytes: usize,
}

/// In-process response cache with TTL expiry and prefix invalidation.
///
/// One instance is constructed at startup and shared by reference with the
/// routing layer; tests build their own for isolation.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: config.max_entries_non_zero().get(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a fresh entry.
    ///
    /// A missing or expired entry is a miss; the expired entry is removed in
    /// the same call, so stale data is never handed out even when the sweep
    /// has not run.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");

        let fresh = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.response.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        };
        drop(entries);

        match fresh {
            Some(response) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                counter!(METRIC_HIT).increment(1);
                Some(response)
            }
            None => {
                self.record_miss();
                None
            }
        }
    }

    /// Insert or overwrite an entry (last write wins).
    ///
    /// When the store is full and `key` is new, the entry with the oldest
    /// `created_at` is evicted first.
    ///
    /// # Panics
    ///
    /// Panics when `key` is empty or `ttl` is zero; both are contract
    /// violations in the calling code, not runtime conditions.
    pub fn insert(&self, key: String, response: CachedResponse, ttl: Duration) {
        assert!(!key.is_empty(), "cache key must not be empty");
        assert!(!ttl.is_zero(), "cache ttl must be positive");

        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "insert");

        while entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(oldest) => {
                    entries.remove(&oldest);
                    counter!(METRIC_EVICT).increment(1);
                    debug!(
                        target: "petalo::cache",
                        key = %oldest,
                        "evicted oldest entry at capacity"
                    );
                }
                None => break,
            }
        }

        entries.insert(
            key,
            CacheEntry {
                response,
                created_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Remove every entry whose key starts with `prefix` and return the
    /// count removed.
    ///
    /// Runs to completion before returning, so a write handler that calls
    /// this sees the drop finished before its own response is sent. If the
    /// entry map's lock was poisoned, the survivors cannot be trusted and
    /// the whole store is dropped instead.
    ///
    /// # Panics
    ///
    /// Panics when `prefix` is empty (a contract violation that would
    /// silently clear the entire store).
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        assert!(!prefix.is_empty(), "invalidation prefix must not be empty");

        let (mut entries, recovered) =
            rw_write_recovered(&self.entries, SOURCE, "invalidate_prefix");

        let before = entries.len();
        if recovered {
            entries.clear();
        } else {
            entries.retain(|key, _| !key.starts_with(prefix));
        }
        let removed = before - entries.len();
        drop(entries);

        counter!(METRIC_INVALIDATED).increment(removed as u64);
        debug!(
            target: "petalo::cache",
            prefix,
            removed,
            widened = recovered,
            "invalidated cached responses"
        );
        removed
    }

    /// Drop all entries unconditionally. Returns the count removed.
    pub fn clear(&self) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "clear");
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Remove all currently-expired entries. Returns the count removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "sweep");
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            counter!(METRIC_SWEPT).increment(removed as u64);
            debug!(target: "petalo::cache", removed, "swept expired entries");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let entries = rw_read(&self.entries, SOURCE, "stats");
        let approx_size_bytes = entries
            .iter()
            .map(|(key, entry)| entry.approx_size_bytes(key))
            .sum();
        CacheStats {
            entry_count: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            approx_size_bytes,
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!(METRIC_MISS).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn sample_response(body: &str) -> CachedResponse {
        CachedResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Bytes::from(body.to_string()),
        }
    }

    fn cache_with_limit(max_entries: usize) -> ResponseCache {
        ResponseCache::new(&CacheConfig {
            max_entries,
            ..Default::default()
        })
    }

    #[test]
    fn get_miss_then_hit_roundtrip() {
        let cache = ResponseCache::new(&CacheConfig::default());

        assert!(cache.get("/products").is_none());

        cache.insert(
            "/products".to_string(),
            sample_response(r#"[{"name":"rose"}]"#),
            Duration::from_secs(300),
        );

        let cached = cache.get("/products").expect("cached response");
        assert_eq!(cached.status, 200);
        assert_eq!(cached.body, Bytes::from(r#"[{"name":"rose"}]"#));
    }

    #[test]
    fn overwriting_a_key_keeps_the_last_write() {
        let cache = ResponseCache::new(&CacheConfig::default());

        cache.insert(
            "/products".to_string(),
            sample_response("first"),
            Duration::from_secs(300),
        );
        cache.insert(
            "/products".to_string(),
            sample_response("second"),
            Duration::from_secs(300),
        );

        assert_eq!(cache.len(), 1);
        let cached = cache.get("/products").expect("cached response");
        assert_eq!(cached.body, Bytes::from("second"));
    }

    #[test]
    fn entries_expire_after_their_ttl() {
        let cache = ResponseCache::new(&CacheConfig::default());

        cache.insert(
            "/products".to_string(),
            sample_response("fresh"),
            Duration::from_millis(20),
        );

        assert!(cache.get("/products").is_some());

        thread::sleep(Duration::from_millis(40));

        assert!(cache.get("/products").is_none());
        // Lazy expiry removed the stale entry outright.
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn invalidate_prefix_reaches_every_query_variant() {
        let cache = ResponseCache::new(&CacheConfig::default());
        let ttl = Duration::from_secs(300);

        cache.insert("/products".to_string(), sample_response("a"), ttl);
        cache.insert(
            "/products?category=mugs".to_string(),
            sample_response("b"),
            ttl,
        );
        cache.insert(
            "/products?category=mugs&is_new=true".to_string(),
            sample_response("c"),
            ttl,
        );
        cache.insert("/categories".to_string(), sample_response("d"), ttl);

        let removed = cache.invalidate_prefix("/products");
        assert_eq!(removed, 3);

        assert!(cache.get("/products").is_none());
        assert!(cache.get("/products?category=mugs").is_none());
        assert!(cache.get("/products?category=mugs&is_new=true").is_none());
        assert!(cache.get("/categories").is_some());
    }

    #[test]
    fn clear_drops_everything() {
        let cache = ResponseCache::new(&CacheConfig::default());
        let ttl = Duration::from_secs(300);

        cache.insert("/banners".to_string(), sample_response("a"), ttl);
        cache.insert("/reels".to_string(), sample_response("b"), ttl);

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn stats_track_hits_and_misses_in_sequence() {
        let cache = ResponseCache::new(&CacheConfig::default());
        let ttl = Duration::from_secs(300);

        // Three misses.
        assert!(cache.get("/products").is_none());
        assert!(cache.get("/products?is_new=true").is_none());
        assert!(cache.get("/banners").is_none());

        cache.insert("/products".to_string(), sample_response("a"), ttl);
        cache.insert("/banners".to_string(), sample_response("b"), ttl);

        // Two hits.
        assert!(cache.get("/products").is_some());
        assert!(cache.get("/banners").is_some());

        let stats = cache.stats();
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.entry_count, 2);
        assert!(stats.approx_size_bytes > 0);
    }

    #[test]
    fn set_then_hit_then_invalidate_then_miss() {
        let cache = ResponseCache::new(&CacheConfig::default());

        cache.insert(
            "/products?category=mugs".to_string(),
            sample_response("mugs"),
            Duration::from_secs(300),
        );

        assert!(cache.get("/products?category=mugs").is_some());
        assert_eq!(cache.stats().hits, 1);

        cache.invalidate_prefix("/products");

        assert!(cache.get("/products?category=mugs").is_none());
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn capacity_evicts_oldest_entry_first() {
        let cache = cache_with_limit(2);
        let ttl = Duration::from_secs(300);

        cache.insert("/products".to_string(), sample_response("a"), ttl);
        thread::sleep(Duration::from_millis(5));
        cache.insert("/categories".to_string(), sample_response("b"), ttl);
        thread::sleep(Duration::from_millis(5));
        cache.insert("/banners".to_string(), sample_response("c"), ttl);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/products").is_none()); // Evicted
        assert!(cache.get("/categories").is_some());
        assert!(cache.get("/banners").is_some());
    }

    #[test]
    fn overwrite_at_capacity_does_not_evict_neighbors() {
        let cache = cache_with_limit(2);
        let ttl = Duration::from_secs(300);

        cache.insert("/products".to_string(), sample_response("a"), ttl);
        cache.insert("/categories".to_string(), sample_response("b"), ttl);
        cache.insert("/products".to_string(), sample_response("a2"), ttl);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/categories").is_some());
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let cache = ResponseCache::new(&CacheConfig::default());

        cache.insert(
            "/products".to_string(),
            sample_response("short"),
            Duration::from_millis(20),
        );
        cache.insert(
            "/categories".to_string(),
            sample_response("long"),
            Duration::from_secs(300),
        );

        thread::sleep(Duration::from_millis(40));

        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/categories").is_some());
    }

    #[test]
    fn concurrent_misses_leave_one_intact_winner() {
        let cache = Arc::new(ResponseCache::new(&CacheConfig::default()));
        let ttl = Duration::from_secs(300);

        let handles: Vec<_> = ["left", "right"]
            .into_iter()
            .map(|payload| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let _ = cache.get("/products");
                    cache.insert("/products".to_string(), sample_response(payload), ttl);
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        let cached = cache.get("/products").expect("one winner stored");
        let body = std::str::from_utf8(&cached.body).expect("utf8 body");
        assert!(body == "left" || body == "right");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn poisoned_lock_widens_invalidation_to_a_full_clear() {
        let cache = ResponseCache::new(&CacheConfig::default());
        let ttl = Duration::from_secs(300);

        cache.insert("/products".to_string(), sample_response("a"), ttl);
        cache.insert("/categories".to_string(), sample_response("b"), ttl);

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = cache
                .entries
                .write()
                .expect("entries lock should be acquired");
            panic!("poison entries lock");
        }));

        let removed = cache.invalidate_prefix("/products");
        assert_eq!(removed, 2);
        assert!(cache.is_empty());
    }

    #[test]
    #[should_panic(expected = "cache key must not be empty")]
    fn empty_key_is_rejected() {
        let cache = ResponseCache::new(&CacheConfig::default());
        cache.insert(
            String::new(),
            sample_response("a"),
            Duration::from_secs(300),
        );
    }

    #[test]
    #[should_panic(expected = "cache ttl must be positive")]
    fn zero_ttl_is_rejected() {
        let cache = ResponseCache::new(&CacheConfig::default());
        cache.insert("/products".to_string(), sample_response("a"), Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "invalidation prefix must not be empty")]
    fn empty_prefix_is_rejected() {
        let cache = ResponseCache::new(&CacheConfig::default());
        cache.invalidate_prefix("");
    }
}
