//! # catalog-kit
//!
//! Read-only core of a film catalog service: films, genres and persons looked up
//! by id, listed and searched over a search index, with single-record lookups
//! accelerated by a cache-aside layer.
//!
//! ## Features
//!
//! - **Cache-aside lookups:** `"<kind>:<id>"` keys, 300 second TTL, cache failures degrade to misses
//! - **Query building:** sort, exact-match filter and weighted fuzzy search, rendered to Elasticsearch DSL
//! - **Availability gate:** docs-only deployments run with no backend connections at all
//! - **Backend agnostic:** in-memory stores by default, Redis and Elasticsearch behind features
//!
//! ## Quick Start
//!
//! ```
//! use catalog_kit::backend::InMemoryBackend;
//! use catalog_kit::index::InMemoryIndex;
//! use catalog_kit::models::Genre;
//! use catalog_kit::service::ListParams;
//! use catalog_kit::Catalog;
//!
//! # #[tokio::main]
//! # async fn main() -> catalog_kit::Result<()> {
//! let index = InMemoryIndex::new();
//! index.insert_entity(&Genre {
//!     id: "g1".to_string(),
//!     name: "Drama".to_string(),
//!     description: None,
//! })?;
//!
//! let catalog = Catalog::armed(InMemoryBackend::new(), index);
//!
//! let drama = catalog.genres().get_by_id("g1").await?;
//! assert_eq!(drama.name, "Drama");
//!
//! let all = catalog.genres().list(ListParams::new()).await?;
//! assert_eq!(all.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Production wiring
//!
//! ```ignore
//! let settings = Settings::from_env()?;
//! let catalog = Catalog::connect(&settings).await?; // features "redis" + "elastic"
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod gate;
pub mod index;
pub mod key;
pub mod models;
pub mod observability;
pub mod query;
pub mod repository;
pub mod serialization;
pub mod service;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use catalog::Catalog;
pub use config::Settings;
pub use entity::{CatalogEntity, EntityKind};
pub use error::{Error, Result};
pub use gate::AvailabilityGate;
pub use index::SearchIndex;
pub use query::{Page, QueryBuilder, QueryDescriptor};
pub use repository::CacheAsideRepository;
pub use service::{CatalogService, FilmService, GenreService, ListParams, PersonService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
