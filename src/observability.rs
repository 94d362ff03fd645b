//! Metrics hooks and TTL policies for the cache-aside lookup.
//!
//! - **Metrics (`CacheMetrics`)**: hits, misses, writes and degraded cache calls
//! - **TTL (`TtlPolicy`)**: how long a cached record lives
//!
//! ```ignore
//! use catalog_kit::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("catalog_cache_hits").inc();
//!     }
//! }
//!
//! // let repository = CacheAsideRepository::new(cache, index)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Every record is written with the same whole-second expiry, 300 seconds
//! unless configured. There is no policy that writes without a TTL.

use crate::error::{Error, Result};
use std::time::Duration;

/// Default time-to-live of a cached record.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Trait for cache metrics collection.
///
/// Default methods log through the `log` crate.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss, including unusable entries.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache write after an index fetch.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a cache-store failure that was degraded to a miss.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Expiry applied to every cached record.
///
/// Always at least one second, so the in-memory and Redis stores expire an
/// entry at the same moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlPolicy(Duration);

impl Default for TtlPolicy {
    fn default() -> Self {
        TtlPolicy(DEFAULT_TTL)
    }
}

impl TtlPolicy {
    /// Fixed expiry for all kinds.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `ttl` is shorter than one second or not
    /// a whole number of seconds.
    pub fn fixed(ttl: Duration) -> Result<Self> {
        if ttl.as_secs() == 0 || ttl.subsec_nanos() != 0 {
            return Err(Error::ConfigError(format!(
                "cache TTL must be a positive whole number of seconds, got {:?}",
                ttl
            )));
        }
        Ok(TtlPolicy(ttl))
    }

    pub fn ttl(&self) -> Duration {
        self.0
    }
}
