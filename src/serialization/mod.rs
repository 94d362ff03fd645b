//! Postcard-based cache serialization with versioned, kind-tagged envelopes.
//!
//! Every cache value written by this crate follows this format:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (varint) │ KIND (string)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────┴──────────────────────────┘
//!   "CKIT"              u32               "film"         postcard::to_allocvec(T)
//! ```
//!
//! Decoding is strict: magic, version and kind must match, and the payload must
//! consume the entire value. Anything else is reported as an error, which the
//! cache-aside repository turns into a cache miss.

use crate::entity::EntityKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for catalog cache entries: b"CKIT"
pub const CACHE_MAGIC: [u8; 4] = *b"CKIT";

/// Current schema version.
///
/// Increment when a cached record shape changes (fields added, removed,
/// reordered or retyped). Old entries then decode as `VersionMismatch` and are
/// rewritten on the next lookup.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope for cache entries.
///
/// # Example
///
/// ```rust
/// use catalog_kit::serialization::CacheEnvelope;
///
/// let envelope = CacheEnvelope::new("film", "data");
/// assert_eq!(envelope.magic, *b"CKIT");
/// assert_eq!(envelope.kind, "film");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<K, T> {
    /// Magic header: must be b"CKIT"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// Entity kind the payload belongs to
    pub kind: K,
    /// The cached record
    pub payload: T,
}

impl<K, T> CacheEnvelope<K, T> {
    /// Create a new envelope with current magic and version.
    pub fn new(kind: K, payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            kind,
            payload,
        }
    }
}

/// Serialize a record with envelope for cache storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn serialize_for_cache<T: Serialize>(kind: EntityKind, value: &T) -> Result<Vec<u8>> {
    let envelope = CacheEnvelope::new(kind.as_str(), value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("Cache serialization failed for {}: {}", kind, e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a record from cache storage with validation.
///
/// # Errors
///
/// - `Error::DeserializationError`: envelope or payload could not be decoded
/// - `Error::InvalidCacheEntry`: bad magic, kind mismatch, or trailing bytes
/// - `Error::VersionMismatch`: schema version mismatch
pub fn deserialize_from_cache<T>(kind: EntityKind, bytes: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let (envelope, rest): (CacheEnvelope<String, T>, &[u8]) = postcard::take_from_bytes(bytes)
        .map_err(|e| {
            debug!("Cache deserialization failed for {}: {}", kind, e);
            Error::DeserializationError(e.to_string())
        })?;

    if envelope.magic != CACHE_MAGIC {
        warn!(
            "Invalid cache entry: expected magic {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION, envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    if envelope.kind != kind.as_str() {
        return Err(Error::InvalidCacheEntry(format!(
            "Kind mismatch: expected {}, got {}",
            kind, envelope.kind
        )));
    }

    if !rest.is_empty() {
        return Err(Error::InvalidCacheEntry(format!(
            "{} trailing bytes after {} payload",
            rest.len(),
            kind
        )));
    }

    Ok(envelope.payload)
}
