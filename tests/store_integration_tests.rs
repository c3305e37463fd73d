//! Integration Tests for the Cache and State Store
//!
//! Drives the public API end to end, including shared use from several tasks.

use std::sync::{Arc, Once};
use std::time::Duration;

use memstate::{
    Cache, CacheConfig, CacheError, ConfigParams, Configurable, Context, ManualClock, MemoryCache,
    MemoryStateStore, NullCache, NullStateStore, StateStore, StateStoreConfig, StateValue,
};

// == Helper Functions ==

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "memstate=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

fn configured_cache(json: &str, clock: &ManualClock) -> anyhow::Result<MemoryCache<i32>> {
    let mut cache = MemoryCache::new().with_clock(Arc::new(clock.clone()));
    cache.configure(&ConfigParams::from_json_str(json)?);
    Ok(cache)
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|k| k.to_string()).collect()
}

// == Cache Scenarios ==

#[tokio::test]
async fn test_overflow_evicts_first_stored_entry() -> anyhow::Result<()> {
    init_tracing();
    let clock = ManualClock::new(1_700_000_000_000);
    let cache = configured_cache(r#"{"options":{"max_size":2,"timeout":1000}}"#, &clock)?;

    cache.store(None, "a", Some(1), 0).await?;
    clock.advance(1);
    cache.store(None, "b", Some(2), 0).await?;
    clock.advance(1);
    cache.store(None, "c", Some(3), 0).await?;

    assert_eq!(cache.retrieve(None, "a").await?, None);
    assert_eq!(cache.retrieve(None, "b").await?, Some(2));
    assert_eq!(cache.retrieve(None, "c").await?, Some(3));
    Ok(())
}

#[tokio::test]
async fn test_overflow_with_identical_timestamps_evicts_first_stored() -> anyhow::Result<()> {
    let clock = ManualClock::new(0);
    let cache = configured_cache(r#"{"options":{"max_size":2,"timeout":1000}}"#, &clock)?;

    for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
        cache.store(None, key, Some(value), 0).await?;
    }

    assert_eq!(cache.retrieve(None, "a").await?, None);
    assert_eq!(cache.len().await, 2);
    Ok(())
}

#[tokio::test]
async fn test_repeated_overflow_converges() -> anyhow::Result<()> {
    let clock = ManualClock::new(0);
    let cache = configured_cache(r#"{"options":{"max_size":3}}"#, &clock)?;

    for i in 0..10 {
        cache.store(None, &format!("k{i}"), Some(i), 0).await?;
        clock.advance(1);
        assert!(cache.len().await <= 3);
    }

    for i in 7..10 {
        assert_eq!(cache.retrieve(None, &format!("k{i}")).await?, Some(i));
    }
    Ok(())
}

#[tokio::test]
async fn test_entry_expires_in_real_time() -> anyhow::Result<()> {
    init_tracing();
    let cache = MemoryCache::new();

    cache.store(None, "k", Some("v".to_string()), 50).await?;
    assert_eq!(cache.retrieve(None, "k").await?, Some("v".to_string()));

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(cache.retrieve(None, "k").await?, None);
    assert!(cache.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn test_store_none_removes_previous_value() -> anyhow::Result<()> {
    let cache = MemoryCache::new();

    cache.store(None, "k", Some("x".to_string()), 0).await?;
    let returned = cache.store(None, "k", None, 0).await?;

    assert_eq!(returned, None);
    assert_eq!(cache.retrieve(None, "k").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_remove_empty_key_fails_with_trace_id() {
    let cache: MemoryCache<String> = MemoryCache::from_config(&CacheConfig::default());
    let context = Context::new("req-7");

    let err = cache.remove(Some(&context), "").await.unwrap_err();

    assert!(matches!(err, CacheError::InvalidArgument { .. }));
    assert_eq!(err.trace_id(), Some("req-7"));
}

#[tokio::test]
async fn test_null_cache_never_stores() -> anyhow::Result<()> {
    let cache = NullCache::new();

    assert_eq!(cache.store(None, "k", Some(42), 1_000).await?, Some(42));
    assert_eq!(Cache::<i32>::retrieve(&cache, None, "k").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_caches_are_interchangeable_behind_trait_object() -> anyhow::Result<()> {
    let caches: Vec<Arc<dyn Cache<String>>> =
        vec![Arc::new(MemoryCache::new()), Arc::new(NullCache::new())];

    for cache in caches {
        let stored = cache.store(None, "k", Some("v".to_string()), 0).await?;
        assert_eq!(stored, Some("v".to_string()));
        cache.remove(None, "k").await?;
        assert_eq!(cache.retrieve(None, "k").await?, None);
    }
    Ok(())
}

#[tokio::test]
async fn test_concurrent_writers_keep_count_consistent() -> anyhow::Result<()> {
    let cache = Arc::new(
        configured_cache(r#"{"options":{"max_size":50}}"#, &ManualClock::new(0))?,
    );

    let mut handles = Vec::new();
    for worker in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..100 {
                let key = format!("w{worker}-{}", i % 20);
                cache.store(None, &key, Some(i), 0).await?;
                if i % 3 == 0 {
                    cache.remove(None, &key).await?;
                }
            }
            Ok::<(), CacheError>(())
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let stats = cache.stats().await;
    assert!(cache.len().await <= 50);
    assert_eq!(stats.total_entries, cache.len().await);
    Ok(())
}

// == State Store Scenarios ==

#[tokio::test]
async fn test_load_bulk_skips_missing_keys() -> anyhow::Result<()> {
    let store = MemoryStateStore::new();

    store.save(None, "k1", "A".to_string()).await?;
    store.save(None, "k2", "B".to_string()).await?;

    let values = store.load_bulk(None, &keys(&["k1", "k2", "k3"])).await?;

    assert_eq!(
        values,
        vec![
            StateValue::new("k1", "A".to_string()),
            StateValue::new("k2", "B".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_state_store_expiry_from_config() -> anyhow::Result<()> {
    let clock = ManualClock::new(0);
    let store = MemoryStateStore::from_config(&StateStoreConfig { timeout_ms: 500 })
        .with_clock(Arc::new(clock.clone()));

    store.save(None, "session", 1).await?;
    clock.advance(400);
    assert_eq!(store.load(None, "session").await?, Some(1));

    clock.advance(101);
    assert_eq!(store.load(None, "session").await?, None);
    assert_eq!(store.delete(None, "session").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_state_values_serialize() -> anyhow::Result<()> {
    let store = MemoryStateStore::new();
    store.save(None, "job", vec![1, 2, 3]).await?;

    let values = store.load_bulk(None, &keys(&["job"])).await?;
    let json = serde_json::to_value(&values)?;

    assert_eq!(json, serde_json::json!([{ "key": "job", "value": [1, 2, 3] }]));
    Ok(())
}

#[tokio::test]
async fn test_null_state_store() -> anyhow::Result<()> {
    let store = NullStateStore::new();

    assert_eq!(store.save(None, "k", "v").await?, "v");
    assert_eq!(StateStore::<&str>::load(&store, None, "k").await?, None);
    assert!(StateStore::<&str>::load_bulk(&store, None, &keys(&["k"]))
        .await?
        .is_empty());
    Ok(())
}
