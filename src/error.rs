//! Error types for the catalog core.

use crate::entity::EntityKind;
use std::fmt;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for catalog operations.
///
/// The routing layer maps these onto transport responses. Only
/// `NotFound`, `InvalidSort` and `BackendDisabled` are caller-meaningful;
/// everything else is an infrastructure fault.
#[derive(Debug, Clone)]
pub enum Error {
    /// The identified entity does not exist in the search index.
    ///
    /// Never retried internally. Usually surfaced as a client-visible 404.
    NotFound {
        /// Entity kind that was looked up
        kind: EntityKind,
        /// Identifier that was not found
        id: String,
    },

    /// Malformed sort parameter (empty field name after stripping `-`).
    InvalidSort(String),

    /// The availability gate is disabled; no backend connections exist.
    ///
    /// Operational state, not a transient fault. Every operation fails the same way.
    BackendDisabled,

    /// Failure talking to the cache store or the search index.
    ///
    /// Common causes:
    /// - Redis or Elasticsearch connection lost
    /// - Transport timeout
    /// - Unexpected status code from the search index
    ///
    /// Cache-store failures never reach the caller of a lookup (they degrade to a
    /// miss); search-index failures always do.
    BackendError(String),

    /// Serialization failed when converting a record to cache bytes.
    SerializationError(String),

    /// Deserialization failed: corrupt cache payload, or a search document that
    /// does not match the expected record shape.
    DeserializationError(String),

    /// Invalid cache entry: bad magic or foreign data under a catalog key.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and cached data.
    ///
    /// Expected during deployments; the entry is treated as a miss and rewritten.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from cached entry)
        found: u32,
    },

    /// Invalid process configuration.
    ConfigError(String),
}

impl Error {
    /// True for `Error::NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for `Error::BackendDisabled`.
    pub fn is_backend_disabled(&self) -> bool {
        matches!(self, Error::BackendDisabled)
    }

    /// True for errors that mean a cached value could not be used.
    pub(crate) fn is_cache_corruption(&self) -> bool {
        matches!(
            self,
            Error::DeserializationError(_)
                | Error::InvalidCacheEntry(_)
                | Error::VersionMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound { kind, id } => write!(f, "{} not found: {}", kind, id),
            Error::InvalidSort(msg) => write!(f, "Invalid sort: {}", msg),
            Error::BackendDisabled => write!(f, "Backends disabled in docs-only mode"),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}

#[cfg(feature = "elastic")]
/// Every failed exchange with the index, decode failures included, is a backend failure.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::BackendError(format!("Elasticsearch timeout: {}", e))
        } else {
            Error::BackendError(format!("Elasticsearch error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            kind: EntityKind::Film,
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "film not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_backend_disabled());
    }

    #[test]
    fn test_backend_disabled() {
        assert!(Error::BackendDisabled.is_backend_disabled());
        assert!(!Error::BackendDisabled.is_not_found());
    }

    #[test]
    fn test_cache_corruption_classes() {
        assert!(Error::InvalidCacheEntry("x".into()).is_cache_corruption());
        assert!(Error::VersionMismatch {
            expected: 1,
            found: 2
        }
        .is_cache_corruption());
        assert!(!Error::BackendError("down".into()).is_cache_corruption());
    }

    #[test]
    fn test_from_serde_json_data_error() {
        let err: Error = serde_json::from_str::<u32>("\"nope\"")
            .expect_err("string is not a u32")
            .into();
        assert!(matches!(err, Error::DeserializationError(_)));
    }
}
