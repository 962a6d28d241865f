use atlas_cache::{CacheHandle, CacheStore, CacheStoreExt, MemoryCache};
use std::time::Duration;

#[tokio::test]
async fn set_get_delete_roundtrip() {
    let cache = MemoryCache::builder().build();

    assert_eq!(cache.get("countries:all").await.unwrap(), None);

    cache.set("countries:all", "[]".to_owned()).await.unwrap();
    assert_eq!(cache.get("countries:all").await.unwrap().as_deref(), Some("[]"));
    assert_eq!(cache.len().await, 1);

    cache.delete("countries:all").await.unwrap();
    assert_eq!(cache.get("countries:all").await.unwrap(), None);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let cache = MemoryCache::builder().ttl(Duration::from_millis(50)).build();
    assert_eq!(cache.ttl(), Duration::from_millis(50));

    cache.set("key", "value".to_owned()).await.unwrap();
    assert!(cache.get("key").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(cache.get("key").await.unwrap(), None, "entry should have expired");
}

#[tokio::test]
async fn json_helpers_encode_and_decode() {
    let cache = MemoryCache::builder().build();
    let names = vec!["Argentina".to_owned(), "Chile".to_owned()];

    cache.set_json("names", &names).await.unwrap();
    assert_eq!(
        cache.get("names").await.unwrap().as_deref(),
        Some(r#"["Argentina","Chile"]"#)
    );

    let decoded: Option<Vec<String>> = cache.get_json("names").await.unwrap();
    assert_eq!(decoded, Some(names));
}

#[tokio::test]
async fn corrupt_json_is_a_serialization_error() {
    let cache = MemoryCache::builder().build();
    cache.set("names", "not json".to_owned()).await.unwrap();

    let err = cache.get_json::<Vec<String>>("names").await.unwrap_err();
    assert!(matches!(err, atlas_cache::CacheError::Serialization { .. }));
    assert!(err.to_string().contains("Decoding cached value for 'names'"));
}

#[tokio::test]
async fn disabled_handle_always_misses() {
    let cache = CacheHandle::Disabled;
    assert!(!cache.is_enabled());

    cache.set("key", "value".to_owned()).await.unwrap();
    assert_eq!(cache.get("key").await.unwrap(), None);
    cache.delete("key").await.unwrap();
}

#[tokio::test]
async fn memory_handle_delegates() {
    let cache = CacheHandle::from(MemoryCache::builder().build());
    assert!(cache.is_enabled());

    cache.set("key", "value".to_owned()).await.unwrap();
    assert_eq!(cache.get("key").await.unwrap().as_deref(), Some("value"));
}
