//! Cache key management utilities.

use crate::entity::{CatalogEntity, EntityKind};

/// Builder for cache keys.
///
/// Keys have the form `"<entity-kind>:<id>"`. The kind is always the first
/// segment, so no key ever mixes kinds even when an id contains `:`.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Build full cache key from entity type and ID.
    pub fn build<E: CatalogEntity>(id: &str) -> String {
        Self::build_for_kind(E::kind(), id)
    }

    /// Build cache key for an explicit kind.
    pub fn build_for_kind(kind: EntityKind, id: &str) -> String {
        format!("{}:{}", kind.as_str(), id)
    }
}
