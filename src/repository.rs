//! Cache-aside repository over a cache store and a search index.
//!
//! Single-record lookups go through the cache; list and search queries always go
//! to the index. The cache is an accelerator only: a broken or unreachable cache
//! store degrades every lookup to an index fetch, it never fails one.

use crate::backend::CacheBackend;
use crate::entity::CatalogEntity;
use crate::error::{Error, Result};
use crate::index::SearchIndex;
use crate::key::CacheKeyBuilder;
use crate::observability::{CacheMetrics, NoOpMetrics, TtlPolicy};
use crate::query::QueryDescriptor;
use std::time::Instant;

/// Cache-aside repository - the only component that touches both backends.
///
/// # Example
///
/// ```
/// use catalog_kit::backend::InMemoryBackend;
/// use catalog_kit::index::InMemoryIndex;
/// use catalog_kit::models::Genre;
/// use catalog_kit::repository::CacheAsideRepository;
///
/// # #[tokio::main]
/// # async fn main() -> catalog_kit::error::Result<()> {
/// let index = InMemoryIndex::new();
/// index.insert_entity(&Genre {
///     id: "g1".to_string(),
///     name: "Drama".to_string(),
///     description: None,
/// })?;
///
/// let repository = CacheAsideRepository::new(InMemoryBackend::new(), index);
/// let genre: Genre = repository.get_by_id("g1").await?;
/// assert_eq!(genre.name, "Drama");
/// # Ok(())
/// # }
/// ```
pub struct CacheAsideRepository<B: CacheBackend, I: SearchIndex> {
    backend: B,
    index: I,
    metrics: Box<dyn CacheMetrics>,
    ttl_policy: TtlPolicy,
}

impl<B: CacheBackend, I: SearchIndex> CacheAsideRepository<B, I> {
    /// Create a repository with no-op metrics and a 300 second TTL.
    pub fn new(backend: B, index: I) -> Self {
        CacheAsideRepository {
            backend,
            index,
            metrics: Box::new(NoOpMetrics),
            ttl_policy: TtlPolicy::default(),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set the expiry used for every cache write.
    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = policy;
        self
    }

    /// Fetch one record, serving it from cache when possible.
    ///
    /// 1. Cache get on `"<kind>:<id>"`. A decodable hit returns immediately.
    /// 2. On miss, unusable entry or cache failure, fetch from the index.
    /// 3. Write the fetched record back with the policy TTL, best effort.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: the index has no such document (nothing is cached)
    /// - `Error::BackendError`: the index is unreachable or timed out
    /// - `Error::DeserializationError`: the index document does not fit the record
    pub async fn get_by_id<E: CatalogEntity>(&self, id: &str) -> Result<E> {
        let timer = Instant::now();
        let cache_key = CacheKeyBuilder::build::<E>(id);

        debug!("» Cache-aside lookup for key: {}", cache_key);

        if let Some(entity) = self.read_cache::<E>(&cache_key, id).await {
            self.metrics.record_hit(&cache_key, timer.elapsed());
            return Ok(entity);
        }
        self.metrics.record_miss(&cache_key, timer.elapsed());

        let descriptor = E::descriptor();
        let document = self
            .index
            .get(descriptor.index, id)
            .await?
            .ok_or_else(|| Error::NotFound {
                kind: descriptor.kind,
                id: id.to_string(),
            })?;
        let entity = E::from_document(document)?;

        self.write_cache(&cache_key, &entity).await;
        info!("✓ Loaded {} from index in {:?}", cache_key, timer.elapsed());

        Ok(entity)
    }

    /// Run a list or search query against the kind's index and project each hit.
    ///
    /// Never touches the cache.
    ///
    /// # Errors
    ///
    /// - `Error::BackendError`: the index is unreachable or rejected the query
    /// - `Error::DeserializationError`: a hit does not fit the projection
    pub async fn query<E: CatalogEntity>(&self, query: &QueryDescriptor) -> Result<Vec<E::Summary>> {
        let descriptor = E::descriptor();
        let hits = self.index.search(descriptor.index, query).await?;
        debug!("{} query returned {} hits", descriptor.kind, hits.len());

        hits.into_iter().map(E::summary_from_document).collect()
    }

    /// Cached record for `cache_key`, or `None` for anything that is not a usable hit.
    async fn read_cache<E: CatalogEntity>(&self, cache_key: &str, id: &str) -> Option<E> {
        let bytes = match self.backend.get(cache_key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache GET failed for {}, falling back to index: {}", cache_key, e);
                self.metrics.record_error(cache_key, &e.to_string());
                return None;
            }
        };

        match E::deserialize_from_cache(&bytes).and_then(|entity| {
            entity.validate(id)?;
            Ok(entity)
        }) {
            Ok(entity) => {
                debug!("✓ Cache hit for {}", cache_key);
                Some(entity)
            }
            Err(e) => {
                if e.is_cache_corruption() {
                    warn!("Unusable cache entry for {}, refetching: {}", cache_key, e);
                } else {
                    error!("Cache decode failed for {}: {}", cache_key, e);
                }
                self.metrics.record_error(cache_key, &e.to_string());
                None
            }
        }
    }

    async fn write_cache<E: CatalogEntity>(&self, cache_key: &str, entity: &E) {
        let timer = Instant::now();
        let ttl = self.ttl_policy.ttl();

        let bytes = match entity.serialize_for_cache() {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to encode {} for cache: {}", cache_key, e);
                return;
            }
        };

        match self.backend.set(cache_key, bytes, Some(ttl)).await {
            Ok(()) => self.metrics.record_set(cache_key, timer.elapsed()),
            Err(e) => {
                warn!("Cache SET failed for {}, continuing uncached: {}", cache_key, e);
                self.metrics.record_error(cache_key, &e.to_string());
            }
        }
    }

    /// Get cache store reference.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get search index reference.
    pub fn index(&self) -> &I {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::index::InMemoryIndex;
    use crate::models::{Film, Genre};
    use crate::observability::DEFAULT_TTL;
    use crate::query::Page;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct CountingMetrics {
        hits: Arc<AtomicUsize>,
        misses: Arc<AtomicUsize>,
        sets: Arc<AtomicUsize>,
        errors: Arc<AtomicUsize>,
    }

    impl CacheMetrics for CountingMetrics {
        fn record_hit(&self, _key: &str, _duration: Duration) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        fn record_miss(&self, _key: &str, _duration: Duration) {
            self.misses.fetch_add(1, Ordering::SeqCst);
        }
        fn record_set(&self, _key: &str, _duration: Duration) {
            self.sets.fetch_add(1, Ordering::SeqCst);
        }
        fn record_error(&self, _key: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn genre(id: &str, name: &str) -> Genre {
        Genre {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
        }
    }

    fn repository() -> CacheAsideRepository<InMemoryBackend, InMemoryIndex> {
        let index = InMemoryIndex::new();
        index.insert_entity(&genre("g1", "Drama")).expect("insert");
        CacheAsideRepository::new(InMemoryBackend::new(), index)
    }

    #[tokio::test]
    async fn test_miss_then_hit_records_metrics() {
        let metrics = CountingMetrics::default();
        let repository = repository().with_metrics(Box::new(metrics.clone()));

        let first: Genre = repository.get_by_id("g1").await.expect("first");
        let second: Genre = repository.get_by_id("g1").await.expect("second");

        assert_eq!(first, second);
        assert_eq!(metrics.misses.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.sets.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.hits.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_uses_ttl_policy() {
        let policy = TtlPolicy::fixed(Duration::from_secs(60)).expect("ttl");
        let repository = repository().with_ttl_policy(policy);

        let _: Genre = repository.get_by_id("g1").await.expect("lookup");

        assert_eq!(
            repository.backend().ttl("genre:g1").await,
            Some(Duration::from_secs(60))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_write_expires() {
        let repository = repository();
        repository
            .index()
            .insert_entity(&genre("g2", "Comedy"))
            .expect("insert");

        let _: Genre = repository.get_by_id("g1").await.expect("g1");
        let _: Genre = repository.get_by_id("g2").await.expect("g2");

        for key in ["genre:g1", "genre:g2"] {
            assert_eq!(repository.backend().ttl(key).await, Some(DEFAULT_TTL));
        }

        tokio::time::advance(DEFAULT_TTL).await;
        for key in ["genre:g1", "genre:g2"] {
            assert!(!repository.backend().exists(key).await.expect("exists"));
        }
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let repository = repository();

        let err = repository.get_by_id::<Genre>("missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "genre not found: missing");
        assert!(repository.backend().is_empty().await);
    }

    #[tokio::test]
    async fn test_entry_for_other_id_is_ignored() {
        let repository = repository();
        let foreign = genre("g2", "Comedy").serialize_for_cache().expect("encode");
        repository
            .backend()
            .set("genre:g1", foreign, None)
            .await
            .expect("seed");

        let genre: Genre = repository.get_by_id("g1").await.expect("lookup");
        assert_eq!(genre.name, "Drama");
    }

    #[tokio::test]
    async fn test_entry_of_other_kind_is_ignored() {
        let repository = repository();
        let film_bytes = crate::serialization::serialize_for_cache(
            crate::entity::EntityKind::Film,
            &genre("g1", "Not a film"),
        )
        .expect("encode");
        repository
            .backend()
            .set("genre:g1", film_bytes, None)
            .await
            .expect("seed");

        let genre: Genre = repository.get_by_id("g1").await.expect("lookup");
        assert_eq!(genre.name, "Drama");
    }

    #[tokio::test]
    async fn test_malformed_document_is_deserialization_error() {
        let index = InMemoryIndex::new();
        index.insert("movies", "f1", serde_json::json!({ "id": "f1" }));
        let repository = CacheAsideRepository::new(InMemoryBackend::new(), index);

        let err = repository.get_by_id::<Film>("f1").await.unwrap_err();
        assert!(matches!(err, Error::DeserializationError(_)));
    }

    #[tokio::test]
    async fn test_query_bypasses_cache() {
        let repository = repository();
        let query = crate::query::QueryBuilder::build_search(Genre::descriptor(), "drama", Page::default());

        let hits = repository.query::<Genre>(&query).await.expect("query");

        assert_eq!(hits.len(), 1);
        assert!(repository.backend().is_empty().await);
    }
}
