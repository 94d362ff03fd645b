//! Shared fixtures and backend stubs for integration tests.

#![allow(dead_code)]

use catalog_kit::backend::CacheBackend;
use catalog_kit::index::{InMemoryIndex, SearchIndex};
use catalog_kit::models::{Film, Genre, GenreRef, Person, PersonFilm, PersonRef};
use catalog_kit::{Error, QueryDescriptor, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Search index wrapper that counts calls before delegating.
#[derive(Clone)]
pub struct CountingIndex<I: SearchIndex> {
    inner: I,
    gets: Arc<AtomicUsize>,
    searches: Arc<AtomicUsize>,
}

impl<I: SearchIndex> CountingIndex<I> {
    pub fn new(inner: I) -> Self {
        CountingIndex {
            inner,
            gets: Arc::new(AtomicUsize::new(0)),
            searches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

impl<I: SearchIndex> SearchIndex for CountingIndex<I> {
    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(index, id).await
    }

    async fn search(&self, index: &str, query: &QueryDescriptor) -> Result<Vec<Value>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(index, query).await
    }
}

/// Search index that is always unreachable.
#[derive(Clone, Default)]
pub struct FailingIndex;

impl SearchIndex for FailingIndex {
    async fn get(&self, _index: &str, _id: &str) -> Result<Option<Value>> {
        Err(Error::BackendError("connection refused".to_string()))
    }

    async fn search(&self, _index: &str, _query: &QueryDescriptor) -> Result<Vec<Value>> {
        Err(Error::BackendError("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Err(Error::BackendError("connection refused".to_string()))
    }
}

/// Cache store whose every call fails, counting write attempts.
#[derive(Clone, Default)]
pub struct FailingBackend {
    sets: Arc<AtomicUsize>,
}

impl FailingBackend {
    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

impl CacheBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(Error::BackendError("cache timeout".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        Err(Error::BackendError("cache timeout".to_string()))
    }
}

fn person_ref(id: &str, full_name: &str) -> PersonRef {
    PersonRef {
        id: id.to_string(),
        full_name: full_name.to_string(),
    }
}

fn genre_ref(id: &str, name: &str) -> GenreRef {
    GenreRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn films() -> Vec<Film> {
    vec![
        Film {
            id: "f-star-wars".to_string(),
            title: "Star Wars".to_string(),
            imdb_rating: Some(8.6),
            description: Some("A farm boy joins a rebellion".to_string()),
            genres: vec![genre_ref("g-scifi", "Sci-Fi"), genre_ref("g-action", "Action")],
            actors: vec![person_ref("p-hamill", "Mark Hamill")],
            writers: vec![person_ref("p-lucas", "George Lucas")],
            directors: vec![person_ref("p-lucas", "George Lucas")],
        },
        Film {
            id: "f-heat".to_string(),
            title: "Heat".to_string(),
            imdb_rating: Some(8.3),
            description: Some("A heist crew and the detective chasing them".to_string()),
            genres: vec![genre_ref("g-action", "Action"), genre_ref("g-drama", "Drama")],
            actors: vec![person_ref("p-pacino", "Al Pacino")],
            writers: vec![person_ref("p-mann", "Michael Mann")],
            directors: vec![person_ref("p-mann", "Michael Mann")],
        },
        Film {
            id: "f-amelie".to_string(),
            title: "Amelie".to_string(),
            imdb_rating: Some(8.3),
            description: Some("A shy waitress decides to change lives".to_string()),
            genres: vec![genre_ref("g-comedy", "Comedy")],
            actors: vec![],
            writers: vec![],
            directors: vec![],
        },
        Film {
            id: "f-documentary".to_string(),
            title: "Empire of Dreams".to_string(),
            imdb_rating: Some(7.9),
            description: Some("The making of the Star Wars trilogy".to_string()),
            genres: vec![genre_ref("g-documentary", "Documentary")],
            actors: vec![person_ref("p-lucas", "George Lucas")],
            writers: vec![],
            directors: vec![],
        },
    ]
}

pub fn genres() -> Vec<Genre> {
    ["Sci-Fi", "Action", "Drama", "Comedy", "Documentary"]
        .iter()
        .map(|name| Genre {
            id: format!("g-{}", name.to_lowercase().replace('-', "")),
            name: name.to_string(),
            description: None,
        })
        .collect()
}

pub fn persons() -> Vec<Person> {
    vec![
        Person {
            id: "p-lucas".to_string(),
            full_name: "George Lucas".to_string(),
            films: vec![PersonFilm {
                id: "f-star-wars".to_string(),
                roles: ["director".to_string(), "writer".to_string()].into_iter().collect(),
            }],
        },
        Person {
            id: "p-hamill".to_string(),
            full_name: "Mark Hamill".to_string(),
            films: vec![PersonFilm {
                id: "f-star-wars".to_string(),
                roles: ["actor".to_string()].into_iter().collect(),
            }],
        },
        Person {
            id: "p-pacino".to_string(),
            full_name: "Al Pacino".to_string(),
            films: vec![],
        },
    ]
}

/// In-memory index loaded with every fixture.
pub fn seeded_index() -> InMemoryIndex {
    let index = InMemoryIndex::new();
    for film in films() {
        index.insert_entity(&film).expect("insert film");
    }
    for genre in genres() {
        index.insert_entity(&genre).expect("insert genre");
    }
    for person in persons() {
        index.insert_entity(&person).expect("insert person");
    }
    index
}
