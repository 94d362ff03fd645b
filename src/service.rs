//! Per-kind catalog facades.
//!
//! One generic service parameterized by the record type; `FilmService`,
//! `GenreService` and `PersonService` are the instances the routing layer uses.

use crate::backend::CacheBackend;
use crate::entity::CatalogEntity;
use crate::error::Result;
use crate::gate::AvailabilityGate;
use crate::index::SearchIndex;
use crate::models::{Film, Genre, Person};
use crate::query::{Page, QueryBuilder};
use std::marker::PhantomData;

/// Parameters of a list call.
///
/// ```
/// use catalog_kit::service::ListParams;
///
/// let params = ListParams::new().sort("-imdb_rating").page(10, 2);
/// assert_eq!(params.page.offset(), 10);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ListParams {
    /// Sort field, `-` prefix for descending.
    pub sort: Option<String>,
    /// Exact-match filter value on the kind's filter field.
    pub filter: Option<String>,
    pub page: Page,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn page(mut self, size: usize, number: usize) -> Self {
        self.page = Page::new(size, number);
        self
    }
}

/// Read-only facade over one entity kind.
///
/// Every call checks the availability gate first; a disabled gate fails with
/// `Error::BackendDisabled` before any I/O.
pub struct CatalogService<E: CatalogEntity, B: CacheBackend, I: SearchIndex> {
    gate: AvailabilityGate<B, I>,
    _entity: PhantomData<fn() -> E>,
}

pub type FilmService<B, I> = CatalogService<Film, B, I>;
pub type GenreService<B, I> = CatalogService<Genre, B, I>;
pub type PersonService<B, I> = CatalogService<Person, B, I>;

impl<E: CatalogEntity, B: CacheBackend, I: SearchIndex> CatalogService<E, B, I> {
    pub fn new(gate: AvailabilityGate<B, I>) -> Self {
        CatalogService {
            gate,
            _entity: PhantomData,
        }
    }

    /// Full record by id, cache-aside.
    ///
    /// # Errors
    ///
    /// - `Error::BackendDisabled`: gate disabled
    /// - `Error::NotFound`: no such record
    /// - `Error::BackendError`: index unreachable
    pub async fn get_by_id(&self, id: &str) -> Result<E> {
        self.gate.repository()?.get_by_id::<E>(id).await
    }

    /// One page of summaries, optionally sorted and filtered.
    ///
    /// # Errors
    ///
    /// - `Error::BackendDisabled`: gate disabled
    /// - `Error::InvalidSort`: sort without a field name
    /// - `Error::BackendError`: index unreachable
    pub async fn list(&self, params: ListParams) -> Result<Vec<E::Summary>> {
        let repository = self.gate.repository()?;
        let query = QueryBuilder::build_list(
            E::descriptor(),
            params.sort.as_deref(),
            params.filter.as_deref(),
            params.page,
        )?;
        repository.query::<E>(&query).await
    }

    /// One page of fuzzy full-text matches, best first.
    ///
    /// # Errors
    ///
    /// - `Error::BackendDisabled`: gate disabled
    /// - `Error::BackendError`: index unreachable
    pub async fn search(&self, query: &str, page: Page) -> Result<Vec<E::Summary>> {
        let repository = self.gate.repository()?;
        let query = QueryBuilder::build_search(E::descriptor(), query, page);
        repository.query::<E>(&query).await
    }

    pub fn is_available(&self) -> bool {
        self.gate.is_armed()
    }
}

impl<E: CatalogEntity, B: CacheBackend, I: SearchIndex> Clone for CatalogService<E, B, I> {
    fn clone(&self) -> Self {
        CatalogService::new(self.gate.clone())
    }
}
