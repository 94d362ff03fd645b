//! Search index implementations.
//!
//! The index is the source of truth for catalog records. It is read-only from the
//! point of view of this crate: documents are loaded by an external ingestion
//! pipeline.

use crate::error::Result;
use crate::query::QueryDescriptor;
use serde_json::Value;

pub mod inmemory;
#[cfg(feature = "elastic")]
pub mod elastic;

pub use inmemory::InMemoryIndex;
#[cfg(feature = "elastic")]
pub use elastic::{ElasticConfig, ElasticIndex};

/// Trait for search index implementations.
///
/// Documents are exchanged as JSON; mapping onto typed records happens in the
/// service layer.
#[allow(async_fn_in_trait)]
pub trait SearchIndex: Send + Sync + Clone {
    /// Fetch one document by id.
    ///
    /// # Returns
    /// - `Ok(Some(document))` - Document found
    /// - `Ok(None)` - No document with this id (not an error)
    ///
    /// # Errors
    /// Returns `Err` for transport failures and timeouts. Never for absence.
    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>>;

    /// Run a list or search query, returning documents in backend order.
    ///
    /// # Errors
    /// Returns `Err` if the index is unavailable or rejects the query.
    async fn search(&self, index: &str, query: &QueryDescriptor) -> Result<Vec<Value>>;

    /// Health check - verify the index is reachable.
    ///
    /// # Errors
    /// Returns `Err` if the index is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
