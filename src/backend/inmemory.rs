//! In-memory cache store (default, thread-safe, async).
//!
//! Uses DashMap for concurrent access with per-key sharding. Expiry is checked on
//! access against the tokio clock, so tests can drive TTLs with
//! `tokio::time::pause` and `advance`.

use super::CacheBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Stored value with optional expiration.
struct StoredValue {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        StoredValue { data, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// Thread-safe async in-memory cache store.
///
/// Clones share the same underlying map.
///
/// # Example
///
/// ```no_run
/// use catalog_kit::backend::{InMemoryBackend, CacheBackend};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set("film:1", b"value".to_vec(), Some(Duration::from_secs(300))).await?;
///     assert!(backend.get("film:1").await?.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, StoredValue>>,
}

impl InMemoryBackend {
    /// Create a new in-memory cache store.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Remaining time-to-live for a key, if it is present and has one.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entry = self.store.get(key)?;
        let expires_at = entry.expires_at?;
        expires_at.checked_duration_since(Instant::now())
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.store.get(key) {
            if !entry.is_expired() {
                debug!("✓ InMemory GET {} -> HIT", key);
                return Ok(Some(entry.data.clone()));
            }
        }

        // Drop the expired entry, if any
        self.store.remove_if(key, |_, entry| entry.is_expired());
        debug!("✓ InMemory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.store
            .insert(key.to_string(), StoredValue::new(value, ttl));

        if let Some(d) = ttl {
            debug!("✓ InMemory SET {} (TTL: {:?})", key, d);
        } else {
            debug!("✓ InMemory SET {}", key);
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self
            .store
            .get(key)
            .is_some_and(|entry| !entry.is_expired()))
    }
}
