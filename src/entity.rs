//! Entity kinds, their descriptors, and the trait every catalog record implements.
//!
//! The three catalog entities (films, genres, persons) share one cache-aside
//! repository and one query builder. Everything that differs between them lives in
//! a static [`EntityDescriptor`]: the search index name, the cache key prefix, the
//! exact-match filter field, the default list ordering and the weighted fields
//! used for fuzzy search.

use crate::error::{Error, Result};
use crate::query::{SortOrder, WeightedField};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// The kind of a catalog entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Film,
    Genre,
    Person,
}

impl EntityKind {
    /// Stable lowercase name, also used as the cache key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Film => "film",
            EntityKind::Genre => "genre",
            EntityKind::Person => "person",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static, per-kind table of names the core needs to build queries and keys.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Entity kind
    pub kind: EntityKind,
    /// Search index holding documents of this kind
    pub index: &'static str,
    /// Field used for the exact-match list filter, if the kind supports one
    pub filter_field: Option<&'static str>,
    /// Ordering applied to `list` when the caller does not request one
    pub default_sort: Option<(&'static str, SortOrder)>,
    /// Fields searched by `search`, with their relative weights
    pub search_fields: &'static [WeightedField],
}

impl EntityDescriptor {
    /// Cache key prefix for this kind.
    pub fn cache_prefix(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Trait implemented by every full catalog record.
///
/// # Example
///
/// ```
/// use catalog_kit::entity::CatalogEntity;
/// use catalog_kit::models::Genre;
///
/// let descriptor = Genre::descriptor();
/// assert_eq!(descriptor.index, "genres");
/// assert_eq!(descriptor.cache_prefix(), "genre");
/// ```
pub trait CatalogEntity: Send + Sync + Serialize + DeserializeOwned + Clone + 'static {
    /// Projection returned by `list` and `search`.
    ///
    /// Films project to a short card; genres and persons are already minimal and
    /// use their full shape.
    type Summary: DeserializeOwned + Send;

    /// Descriptor for this entity kind.
    fn descriptor() -> &'static EntityDescriptor;

    /// Identifier of this record.
    fn id(&self) -> &str;

    /// Entity kind shorthand.
    fn kind() -> EntityKind {
        Self::descriptor().kind
    }

    /// Encode for cache storage.
    ///
    /// Uses the versioned envelope from `crate::serialization`, tagged with the
    /// entity kind so an entry can never decode as another kind.
    fn serialize_for_cache(&self) -> Result<Vec<u8>> {
        crate::serialization::serialize_for_cache(Self::kind(), self)
    }

    /// Decode from cache storage.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidCacheEntry`: bad magic, wrong kind, or trailing bytes
    /// - `Error::VersionMismatch`: schema version changed
    /// - `Error::DeserializationError`: corrupted payload
    fn deserialize_from_cache(bytes: &[u8]) -> Result<Self> {
        crate::serialization::deserialize_from_cache(Self::kind(), bytes)
    }

    /// Map a search-index document onto this record.
    fn from_document(document: serde_json::Value) -> Result<Self> {
        serde_json::from_value(document).map_err(|e| {
            Error::DeserializationError(format!("{} document: {}", Self::kind(), e))
        })
    }

    /// Map a search-index document onto the list/search projection.
    fn summary_from_document(document: serde_json::Value) -> Result<Self::Summary> {
        serde_json::from_value(document).map_err(|e| {
            Error::DeserializationError(format!("{} summary: {}", Self::kind(), e))
        })
    }

    /// Validate a record decoded from cache.
    ///
    /// A record whose id differs from the one requested is never served.
    fn validate(&self, requested_id: &str) -> Result<()> {
        if self.id() == requested_id {
            Ok(())
        } else {
            Err(Error::InvalidCacheEntry(format!(
                "{} entry for {} holds id {}",
                Self::kind(),
                requested_id,
                self.id()
            )))
        }
    }
}
