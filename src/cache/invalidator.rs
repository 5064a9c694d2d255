//! Cache invalidation service.
//!
//! Write handlers call one method per resource kind after their repository
//! operation succeeds; the affected prefixes are resolved through the
//! declarative family table, so no handler carries its own invalidation
//! list.

use std::sync::Arc;

use tracing::debug;

use super::config::CacheConfig;
use super::families::ResourceFamily;
use super::store::ResponseCache;

/// Synchronous prefix invalidation, driven by the family table.
///
/// # Usage
///
/// ```ignore
/// // After a successful product update:
/// state.invalidator.product_changed();
/// ```
pub struct CacheInvalidator {
    store: Arc<ResponseCache>,
    enabled: bool,
}

impl CacheInvalidator {
    pub fn new(config: &CacheConfig, store: Arc<ResponseCache>) -> Self {
        Self {
            store,
            enabled: config.enabled,
        }
    }

    /// Drop every cached response affected by a write on `family`.
    ///
    /// Completes before returning, so the very next read under any affected
    /// prefix misses and refetches.
    pub fn family_changed(&self, family: ResourceFamily) {
        if !self.enabled {
            debug!(target: "petalo::cache", ?family, "invalidation skipped: cache disabled");
            return;
        }

        for affected in family.invalidates() {
            let removed = self.store.invalidate_prefix(affected.prefix());
            debug!(
                target: "petalo::cache",
                changed = ?family,
                affected = ?affected,
                removed,
                "invalidated resource family"
            );
        }
    }

    pub fn product_changed(&self) {
        self.family_changed(ResourceFamily::Products);
    }

    pub fn category_changed(&self) {
        self.family_changed(ResourceFamily::Categories);
    }

    pub fn occasion_changed(&self) {
        self.family_changed(ResourceFamily::Occasions);
    }

    pub fn banner_changed(&self) {
        self.family_changed(ResourceFamily::Banners);
    }

    pub fn reel_changed(&self) {
        self.family_changed(ResourceFamily::Reels);
    }
}
