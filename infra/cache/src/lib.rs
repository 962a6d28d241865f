//! # Cache Infrastructure
//!
//! A small key-value cache contract ([`CacheStore`]) used for read-through caching of
//! serialized query results, plus the backends the workspace ships:
//!
//! - [`MemoryCache`]: in-process [moka](https://docs.rs/moka) cache with a fixed TTL.
//! - [`CacheHandle::Disabled`]: every read misses, every write is dropped.
//!
//! Values are opaque strings; [`CacheStoreExt`] adds JSON helpers on top.
//!
//! ## Example
//!
//! ```rust
//! use atlas_cache::{CacheStore, MemoryCache};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), atlas_cache::CacheError> {
//! let cache = MemoryCache::builder().ttl(Duration::from_secs(60)).build();
//! cache.set("countries:all", "[]".to_owned()).await?;
//! assert_eq!(cache.get("countries:all").await?.as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{CacheError, CacheErrorExt};

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::trace;

const DEFAULT_TTL: Duration = Duration::from_secs(60);
const DEFAULT_CAPACITY: u64 = 1024;

/// Minimal key-value cache contract.
///
/// Implementations must be cheap to clone or share, and every operation may fail:
/// callers decide whether a failure is fatal.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CacheError>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), CacheError>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send;
}

/// JSON helpers for any [`CacheStore`].
pub trait CacheStoreExt: CacheStore {
    /// Reads and decodes a JSON value.
    fn get_json<T>(&self, key: &str) -> impl Future<Output = Result<Option<T>, CacheError>> + Send
    where
        T: DeserializeOwned,
    {
        async move {
            match self.get(key).await? {
                Some(raw) => {
                    let value = serde_json::from_str(&raw)
                        .context(format!("Decoding cached value for '{key}'"))?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Encodes a value as JSON and stores it.
    fn set_json<T>(&self, key: &str, value: &T) -> impl Future<Output = Result<(), CacheError>> + Send
    where
        T: Serialize + Sync,
    {
        async move {
            let raw =
                serde_json::to_string(value).context(format!("Encoding value for '{key}'"))?;
            self.set(key, raw).await
        }
    }
}

impl<S: CacheStore> CacheStoreExt for S {}

/// In-process cache backed by `moka`; entries expire after the configured TTL.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    inner: Cache<String, String>,
    ttl: Duration,
}

impl MemoryCache {
    pub fn builder() -> MemoryCacheBuilder {
        MemoryCacheBuilder::default()
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Approximate number of live entries, after applying pending evictions.
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let value = self.inner.get(key).await;
        trace!(key, hit = value.is_some(), "Memory cache lookup");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.inner.insert(key.to_owned(), value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.invalidate(key).await;
        Ok(())
    }
}

/// Fluent builder for [`MemoryCache`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct MemoryCacheBuilder {
    ttl: Duration,
    max_capacity: u64,
}

impl Default for MemoryCacheBuilder {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, max_capacity: DEFAULT_CAPACITY }
    }
}

impl MemoryCacheBuilder {
    /// Time-to-live applied to every entry.
    pub const fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub const fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn build(self) -> MemoryCache {
        let inner = Cache::builder().max_capacity(self.max_capacity).time_to_live(self.ttl).build();
        MemoryCache { inner, ttl: self.ttl }
    }
}

/// Backend selected at startup.
#[derive(Debug, Clone)]
pub enum CacheHandle {
    Memory(MemoryCache),
    /// Always misses; writes are no-ops.
    Disabled,
}

impl CacheHandle {
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Memory(_))
    }
}

impl From<MemoryCache> for CacheHandle {
    fn from(cache: MemoryCache) -> Self {
        Self::Memory(cache)
    }
}

impl CacheStore for CacheHandle {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            Self::Memory(cache) => cache.get(key).await,
            Self::Disabled => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        match self {
            Self::Memory(cache) => cache.set(key, value).await,
            Self::Disabled => Ok(()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Self::Memory(cache) => cache.delete(key).await,
            Self::Disabled => Ok(()),
        }
    }
}

impl<S: CacheStore> CacheStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CacheError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), CacheError>> + Send {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send {
        (**self).delete(key)
    }
}
