//! Cache behavior scenarios shared by the in-memory and MongoDB test suites.
//!
//! Each scenario takes the document store to run against and a collection
//! name private to the test, and checks physical presence with `find_one`
//! directly on the store, bypassing the cache's expiry check.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use mongo_ttl_cache::{CacheError, CacheOptions, CacheStore, DocumentStore};
use tokio::time::sleep;

pub fn cache(store: &Arc<dyn DocumentStore>, options: CacheOptions) -> CacheStore {
    CacheStore::new(Arc::clone(store), options).unwrap()
}

pub async fn is_present(store: &Arc<dyn DocumentStore>, collection: &str, key: &str) -> bool {
    store.find_one(collection, key).await.unwrap().is_some()
}

/// TTL 100ms, no sweep: visible at 50ms, gone at 150ms.
pub async fn lazy_expiration(store: Arc<dyn DocumentStore>, collection: &str) {
    let cache = cache(
        &store,
        CacheOptions::default()
            .collection(collection)
            .default_ttl(Duration::from_millis(100)),
    );

    cache.set("a", "1").await.unwrap();

    sleep(Duration::from_millis(50)).await;
    assert_eq!(cache.get::<String>("a").await.unwrap(), "1");

    sleep(Duration::from_millis(100)).await;
    let result = cache.get::<String>("a").await;
    assert!(matches!(result, Err(CacheError::NotFound(_))));
    assert!(!is_present(&store, collection, "a").await);
}

/// Deleting a missing key, and deleting twice, both succeed.
pub async fn idempotent_delete(store: Arc<dyn DocumentStore>, collection: &str) {
    let cache = cache(&store, CacheOptions::default().collection(collection));

    cache.delete("never-set").await.unwrap();

    cache.set("k", "v").await.unwrap();
    cache.delete("k").await.unwrap();
    cache.delete("k").await.unwrap();

    assert!(cache.get::<String>("k").await.unwrap_err().is_not_found());
    assert!(!is_present(&store, collection, "k").await);
}

/// A second set replaces the value and pushes the expiry out from the second call.
pub async fn overwrite_resets_expiry(store: Arc<dyn DocumentStore>, collection: &str) {
    let cache = cache(
        &store,
        CacheOptions::default()
            .collection(collection)
            .default_ttl(Duration::from_millis(200)),
    );

    cache.set("k", "v1").await.unwrap();
    sleep(Duration::from_millis(120)).await;
    cache.set("k", "v2").await.unwrap();
    sleep(Duration::from_millis(120)).await;

    // 240ms after the first set, 120ms after the second
    assert_eq!(cache.get::<String>("k").await.unwrap(), "v2");
}

/// TTL 50ms, sweep every 100ms: both documents are physically gone by 250ms.
pub async fn sweep_removes_documents(store: Arc<dyn DocumentStore>, collection: &str) {
    let cache = cache(
        &store,
        CacheOptions::default()
            .collection(collection)
            .default_ttl(Duration::from_millis(50))
            .sweep_interval(Duration::from_millis(100))
            .start_sweep(true),
    );

    cache.set("a", "1").await.unwrap();
    cache.set("b", "2").await.unwrap();
    assert_eq!(cache.get::<String>("a").await.unwrap(), "1");
    assert_eq!(cache.get::<String>("b").await.unwrap(), "2");

    sleep(Duration::from_millis(250)).await;

    assert!(!is_present(&store, collection, "a").await);
    assert!(!is_present(&store, collection, "b").await);

    cache.stop_sweep();
}

/// After stop_sweep nothing removes the expired document, yet get hides it.
pub async fn stop_sweep_is_effective(store: Arc<dyn DocumentStore>, collection: &str) {
    let cache = cache(
        &store,
        CacheOptions::default()
            .collection(collection)
            .sweep_interval(Duration::from_millis(30))
            .start_sweep(true),
    );
    assert!(cache.is_sweeping());

    cache.stop_sweep();
    assert!(!cache.is_sweeping());

    cache
        .set_with_ttl("k", "v", Duration::from_millis(20))
        .await
        .unwrap();

    sleep(Duration::from_millis(200)).await;
    assert!(is_present(&store, collection, "k").await);

    assert!(cache.get::<String>("k").await.unwrap_err().is_not_found());
}

/// Two caches with different options share one store without interfering.
pub async fn caches_share_store(store: Arc<dyn DocumentStore>, collection: &str) {
    let other = format!("{}_other", collection);
    let short = cache(
        &store,
        CacheOptions::default()
            .collection(collection)
            .default_ttl(Duration::from_millis(20)),
    );
    let long = cache(&store, CacheOptions::default().collection(other.as_str()));

    short.set("k", "short").await.unwrap();
    long.set("k", "long").await.unwrap();

    sleep(Duration::from_millis(50)).await;
    assert_eq!(short.sweep_now().await.unwrap(), 1);
    assert_eq!(long.sweep_now().await.unwrap(), 0);

    assert!(short.get::<String>("k").await.unwrap_err().is_not_found());
    assert_eq!(long.get::<String>("k").await.unwrap(), "long");

    long.delete("k").await.unwrap();
}
