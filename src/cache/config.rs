//! Response cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

// Default values for cache configuration
const DEFAULT_RESPONSE_TTL_MS: u64 = 300_000;
const DEFAULT_MAX_ENTRIES: usize = 10_000;
const DEFAULT_RESPONSE_BODY_LIMIT_BYTES: usize = 1024 * 1024;
const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60_000;

/// Cache behavior knobs from `petalo.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the response cache.
    pub enabled: bool,
    /// Time-to-live for stored responses, in milliseconds.
    pub response_ttl_ms: u64,
    /// Maximum number of stored responses before oldest-first eviction.
    pub max_entries: usize,
    /// Largest response body the cache will store, in bytes.
    pub response_body_limit_bytes: usize,
    /// Interval between background sweeps of expired entries, in milliseconds.
    pub sweep_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            response_ttl_ms: DEFAULT_RESPONSE_TTL_MS,
            max_entries: DEFAULT_MAX_ENTRIES,
            response_body_limit_bytes: DEFAULT_RESPONSE_BODY_LIMIT_BYTES,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            response_ttl_ms: settings.response_ttl_ms.get(),
            max_entries: settings.max_entries.get(),
            response_body_limit_bytes: settings.response_body_limit_bytes,
            sweep_interval_ms: settings.sweep_interval_ms.get(),
        }
    }
}

impl CacheConfig {
    pub fn response_ttl(&self) -> Duration {
        Duration::from_millis(self.response_ttl_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Returns the entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn max_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.response_ttl_ms, 300_000);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.response_body_limit_bytes, 1024 * 1024);
        assert_eq!(config.sweep_interval_ms, 60_000);
    }

    #[test]
    fn max_entries_clamps_to_min() {
        let config = CacheConfig {
            max_entries: 0,
            ..Default::default()
        };
        assert_eq!(config.max_entries_non_zero().get(), 1);
    }

    #[test]
    fn ttl_round_trips_through_duration() {
        let config = CacheConfig {
            response_ttl_ms: 1_500,
            ..Default::default()
        };
        assert_eq!(config.response_ttl(), Duration::from_millis(1_500));
    }
}
