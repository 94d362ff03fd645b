//! Basic usage of the catalog core over in-memory backends.

use catalog_kit::{
    backend::InMemoryBackend,
    error::Result,
    index::InMemoryIndex,
    models::{Film, Genre, GenreRef, Person, PersonFilm, PersonRef},
    Catalog, ListParams, Page,
};

fn load_index() -> Result<InMemoryIndex> {
    let index = InMemoryIndex::new();

    let lucas = PersonRef {
        id: "p-lucas".to_string(),
        full_name: "George Lucas".to_string(),
    };
    let scifi = GenreRef {
        id: "g-scifi".to_string(),
        name: "Sci-Fi".to_string(),
    };

    index.insert_entity(&Film {
        id: "f-star-wars".to_string(),
        title: "Star Wars".to_string(),
        imdb_rating: Some(8.6),
        description: Some("A farm boy joins a rebellion".to_string()),
        genres: vec![scifi.clone()],
        actors: vec![],
        writers: vec![lucas.clone()],
        directors: vec![lucas],
    })?;
    index.insert_entity(&Film {
        id: "f-thx".to_string(),
        title: "THX 1138".to_string(),
        imdb_rating: Some(6.7),
        description: None,
        genres: vec![scifi.clone()],
        actors: vec![],
        writers: vec![],
        directors: vec![],
    })?;
    index.insert_entity(&Genre {
        id: scifi.id,
        name: scifi.name,
        description: Some("Space and the future".to_string()),
    })?;
    index.insert_entity(&Person {
        id: "p-lucas".to_string(),
        full_name: "George Lucas".to_string(),
        films: vec![PersonFilm {
            id: "f-star-wars".to_string(),
            roles: ["director".to_string(), "writer".to_string()]
                .into_iter()
                .collect(),
        }],
    })?;

    Ok(index)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Catalog Kit - Basic Example ===\n");

    // 1. Wire backends
    println!("1. Initializing in-memory cache and index...");
    let catalog = Catalog::armed(InMemoryBackend::new(), load_index()?);
    println!("   ✓ Catalog armed: {}\n", catalog.gate().is_armed());

    // 2. First lookup - cache miss, index fetch, cache write
    println!("2. First lookup for film f-star-wars:");
    let film = catalog.films().get_by_id("f-star-wars").await?;
    println!("   ✓ Loaded: {} ({:?})\n", film.title, film.imdb_rating);

    // 3. Second lookup - cache hit
    println!("3. Second lookup for the same film:");
    let film = catalog.films().get_by_id("f-star-wars").await?;
    println!("   ✓ Served from cache: {}\n", film.title);

    // 4. Unknown id
    println!("4. Lookup for an unknown film:");
    match catalog.films().get_by_id("f-unknown").await {
        Err(e) if e.is_not_found() => println!("   ✓ {}\n", e),
        other => println!("   ✗ Unexpected: {:?}\n", other),
    }

    // 5. List sorted by rating, filtered by genre
    println!("5. Sci-Fi films by rating, best first:");
    let films = catalog
        .films()
        .list(ListParams::new().sort("-imdb_rating").filter("Sci-Fi").page(10, 1))
        .await?;
    for film in &films {
        println!("   - {} ({:?})", film.title, film.imdb_rating);
    }
    println!();

    // 6. Fuzzy search
    println!("6. Searching persons for \"Goerge Lucas\":");
    for person in catalog.persons().search("Goerge Lucas", Page::default()).await? {
        println!("   - {} ({} films)", person.full_name, person.films.len());
    }
    println!();

    // 7. Docs-only deployment
    println!("7. Disabled catalog:");
    let docs_only: Catalog<InMemoryBackend, InMemoryIndex> = Catalog::disabled();
    match docs_only.genres().list(ListParams::new()).await {
        Err(e) if e.is_backend_disabled() => println!("   ✓ {}\n", e),
        other => println!("   ✗ Unexpected: {:?}\n", other),
    }

    println!("=== Example Complete ===\n");
    Ok(())
}
