//! Composition root: one gate, three facades.
//!
//! Built once at process start and handed to the routing layer. All facades share
//! the same gate, so they are either all armed or all disabled.

use crate::backend::CacheBackend;
use crate::error::Result;
use crate::gate::AvailabilityGate;
use crate::index::SearchIndex;
use crate::repository::CacheAsideRepository;
use crate::service::{CatalogService, FilmService, GenreService, PersonService};

/// The catalog facades wired to one set of backends.
///
/// # Example
///
/// ```
/// use catalog_kit::backend::InMemoryBackend;
/// use catalog_kit::index::InMemoryIndex;
/// use catalog_kit::Catalog;
///
/// # #[tokio::main]
/// # async fn main() {
/// let catalog: Catalog<InMemoryBackend, InMemoryIndex> = Catalog::disabled();
/// let err = catalog.films().get_by_id("42").await.unwrap_err();
/// assert!(err.is_backend_disabled());
/// # }
/// ```
pub struct Catalog<B: CacheBackend, I: SearchIndex> {
    gate: AvailabilityGate<B, I>,
    films: FilmService<B, I>,
    genres: GenreService<B, I>,
    persons: PersonService<B, I>,
}

impl<B: CacheBackend, I: SearchIndex> Catalog<B, I> {
    /// Armed catalog with default metrics and TTL.
    pub fn armed(cache: B, index: I) -> Self {
        Self::armed_with(CacheAsideRepository::new(cache, index))
    }

    /// Armed catalog over a preconfigured repository.
    pub fn armed_with(repository: CacheAsideRepository<B, I>) -> Self {
        Self::from_gate(AvailabilityGate::armed(repository))
    }

    /// Disabled catalog: every operation fails with `Error::BackendDisabled`.
    pub fn disabled() -> Self {
        Self::from_gate(AvailabilityGate::disabled())
    }

    fn from_gate(gate: AvailabilityGate<B, I>) -> Self {
        Catalog {
            films: CatalogService::new(gate.clone()),
            genres: CatalogService::new(gate.clone()),
            persons: CatalogService::new(gate.clone()),
            gate,
        }
    }

    pub fn films(&self) -> &FilmService<B, I> {
        &self.films
    }

    pub fn genres(&self) -> &GenreService<B, I> {
        &self.genres
    }

    pub fn persons(&self) -> &PersonService<B, I> {
        &self.persons
    }

    pub fn gate(&self) -> &AvailabilityGate<B, I> {
        &self.gate
    }

    /// Ping the cache store and the search index.
    ///
    /// # Errors
    /// Returns `Error::BackendDisabled` when disabled, or the first backend failure.
    pub async fn health_check(&self) -> Result<bool> {
        let repository = self.gate.repository()?;
        let cache = repository.backend().health_check().await?;
        let index = repository.index().health_check().await?;
        if !(cache && index) {
            warn!("Catalog health check: cache={} index={}", cache, index);
        }
        Ok(cache && index)
    }
}

#[cfg(all(feature = "redis", feature = "elastic"))]
impl Catalog<crate::backend::RedisBackend, crate::index::ElasticIndex> {
    /// Build the production catalog from settings.
    ///
    /// With `docs_only` set, no connection is attempted and the catalog is disabled.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` for a cache TTL under one second, or `Err` if
    /// the Redis pool or the HTTP client cannot be created.
    pub async fn connect(settings: &crate::config::Settings) -> Result<Self> {
        if settings.docs_only {
            info!("✓ {} starting in docs-only mode, backends disabled", settings.project_name);
            return Ok(Self::disabled());
        }

        let cache = crate::backend::RedisBackend::new(settings.redis_config()).await?;
        let index = crate::index::ElasticIndex::new(settings.elastic_config())?;
        let ttl_policy = crate::observability::TtlPolicy::fixed(settings.cache_ttl)?;
        let repository = CacheAsideRepository::new(cache, index).with_ttl_policy(ttl_policy);

        info!("✓ {} catalog connected", settings.project_name);
        Ok(Self::armed_with(repository))
    }
}
