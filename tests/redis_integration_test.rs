//! Redis cache store integration tests.
//!
//! These tests require a running Redis instance and are ignored by default.
//!
//! ```bash
//! docker run --rm -p 6379:6379 redis:7
//! cargo test --features redis --test redis_integration_test -- --ignored
//! ```
//!
//! ## Environment Variables
//!
//! - `REDIS_HOST`, `REDIS_PORT`: Redis location (default: 127.0.0.1:6379)

#![cfg(feature = "redis")]

mod common;

use catalog_kit::backend::{CacheBackend, RedisBackend};
use catalog_kit::{Catalog, CatalogEntity, Settings};
use common::{seeded_index, CountingIndex};
use std::time::Duration;

async fn create_test_backend() -> RedisBackend {
    common::init_logging();
    let settings = Settings::from_env().expect("settings");
    RedisBackend::new(settings.redis_config())
        .await
        .expect("Failed to create Redis backend")
}

#[tokio::test]
#[ignore]
async fn test_redis_health_check() {
    let backend = create_test_backend().await;
    assert!(backend.health_check().await.expect("PING"));
}

#[tokio::test]
#[ignore]
async fn test_redis_cache_aside_roundtrip() {
    let backend = create_test_backend().await;
    let index = CountingIndex::new(seeded_index());
    let catalog = Catalog::armed(backend.clone(), index.clone());

    // Start from a cold key: write an expiring placeholder and wait it out
    backend
        .set("film:f-heat", b"stale".to_vec(), Some(Duration::from_secs(1)))
        .await
        .expect("seed");
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let first = catalog.films().get_by_id("f-heat").await.expect("first");
    let second = catalog.films().get_by_id("f-heat").await.expect("second");

    assert_eq!(first, second);
    assert_eq!(index.gets(), 1);

    let bytes = backend
        .get("film:f-heat")
        .await
        .expect("GET")
        .expect("entry written");
    assert_eq!(
        catalog_kit::models::Film::deserialize_from_cache(&bytes).expect("decode"),
        first
    );
}

#[tokio::test]
#[ignore]
async fn test_redis_concurrent_lookups() {
    let backend = create_test_backend().await;
    let catalog = std::sync::Arc::new(Catalog::armed(backend, seeded_index()));

    let mut handles = vec![];
    for id in ["g-action", "g-drama", "g-comedy", "g-scifi"] {
        let catalog = catalog.clone();
        handles.push(tokio::spawn(async move {
            catalog.genres().get_by_id(id).await.map(|g| g.id)
        }));
    }

    for handle in handles {
        handle.await.expect("task").expect("lookup");
    }
}
