//! Petalo response cache.
//!
//! An in-process cache for the storefront's hot read endpoints. Responses
//! are keyed by canonical request identity (path + sorted query string),
//! expire after a configurable TTL, and are dropped synchronously by
//! resource-family prefix whenever an admin write lands.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `petalo.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! response_ttl_ms = 300000
//! max_entries = 10000
//! # ... see config.rs for all options
//! ```

mod config;
mod families;
mod invalidator;
mod keys;
mod lock;
mod middleware;
mod store;

pub use config::CacheConfig;
pub use families::{ALL_FAMILIES, ResourceFamily};
pub use invalidator::CacheInvalidator;
pub use keys::canonical_key;
pub use middleware::{CACHE_STATUS_HEADER, CacheState, response_cache_layer, should_store_response};
pub use store::{CacheStats, CachedResponse, ResponseCache};
