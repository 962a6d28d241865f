use atlas_cache::{CacheError, CacheHandle, CacheStore, MemoryCache};
use atlas_countries::{
    Country, CountryError, CountryRepository, CountryService, MIGRATIONS, SurrealCountryRepository,
};
use atlas_database::Database;
use atlas_kernel::domain::constants::COUNTRIES_CACHE_KEY;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counts `get_all` calls that reach the store.
#[derive(Debug)]
struct CountingRepository {
    inner: SurrealCountryRepository,
    list_calls: AtomicUsize,
}

impl CountingRepository {
    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl CountryRepository for CountingRepository {
    async fn get_all(&self) -> Result<Vec<Country>, CountryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Country>, CountryError> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, name: &str) -> Result<Country, CountryError> {
        self.inner.create(name).await
    }

    async fn update(&self, id: &str, name: &str) -> Result<Country, CountryError> {
        self.inner.update(id, name).await
    }

    async fn delete(&self, id: &str) -> Result<(), CountryError> {
        self.inner.delete(id).await
    }
}

/// Holds the next `get_all` after it has read the store, until `resume` is notified.
#[derive(Debug)]
struct PausingRepository {
    inner: SurrealCountryRepository,
    pause_next: AtomicBool,
    read_done: Notify,
    resume: Notify,
}

impl PausingRepository {
    fn new(inner: SurrealCountryRepository) -> Self {
        Self { inner, pause_next: AtomicBool::new(false), read_done: Notify::new(), resume: Notify::new() }
    }
}

impl CountryRepository for PausingRepository {
    async fn get_all(&self) -> Result<Vec<Country>, CountryError> {
        let countries = self.inner.get_all().await?;
        if self.pause_next.swap(false, Ordering::SeqCst) {
            self.read_done.notify_one();
            self.resume.notified().await;
        }
        Ok(countries)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Country>, CountryError> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, name: &str) -> Result<Country, CountryError> {
        self.inner.create(name).await
    }

    async fn update(&self, id: &str, name: &str) -> Result<Country, CountryError> {
        self.inner.update(id, name).await
    }

    async fn delete(&self, id: &str) -> Result<(), CountryError> {
        self.inner.delete(id).await
    }
}

/// A cache backend that is always down.
#[derive(Debug)]
struct BrokenCache;

impl CacheStore for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err("cache unreachable".into())
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), CacheError> {
        Err("cache unreachable".into())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err("cache unreachable".into())
    }
}

async fn surreal_repository() -> SurrealCountryRepository {
    let db = Database::builder()
        .url("mem://")
        .session("test", "countries")
        .migrations(MIGRATIONS)
        .init()
        .await
        .expect("in-memory database");
    SurrealCountryRepository::new(db)
}

async fn counting_repository() -> Arc<CountingRepository> {
    Arc::new(CountingRepository {
        inner: surreal_repository().await,
        list_calls: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn second_list_is_served_from_cache() {
    let repo = counting_repository().await;
    let cache = MemoryCache::builder().build();
    let service = CountryService::new(Arc::clone(&repo), cache.clone());

    service.create("Chile").await.expect("create");

    let first = service.list().await.expect("first list");
    let second = service.list().await.expect("second list");
    assert_eq!(first, second);
    assert_eq!(repo.list_calls(), 1, "second list must not reach the store");

    let cached = cache.get(COUNTRIES_CACHE_KEY).await.expect("cache get").expect("cached");
    assert_eq!(serde_json::from_str::<Vec<Country>>(&cached).expect("json"), first);
}

#[tokio::test]
async fn every_mutation_invalidates_the_list() {
    let repo = counting_repository().await;
    let service = CountryService::new(Arc::clone(&repo), MemoryCache::builder().build());

    let chile = service.create("Chile").await.expect("create");
    assert_eq!(service.list().await.expect("list"), vec![chile.clone()]);

    let renamed = service.update(&chile.id, "Chilito").await.expect("update");
    assert_eq!(service.list().await.expect("list after update"), vec![renamed.clone()]);

    service.create("Peru").await.expect("create");
    let mut names: Vec<_> =
        service.list().await.expect("list after create").into_iter().map(|c| c.name).collect();
    names.sort();
    assert_eq!(names, ["Chilito", "Peru"]);

    service.delete(&renamed.id).await.expect("delete");
    let names: Vec<_> =
        service.list().await.expect("list after delete").into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Peru"]);

    assert_eq!(repo.list_calls(), 4);
}

#[tokio::test]
async fn failed_mutations_keep_the_cached_list() {
    let repo = counting_repository().await;
    let service = CountryService::new(Arc::clone(&repo), MemoryCache::builder().build());

    service.create("Chile").await.expect("create");
    service.list().await.expect("warm cache");

    service.create("CHILE").await.expect_err("duplicate");
    service.delete("missing").await.expect_err("not found");
    service.list().await.expect("cached list");

    assert_eq!(repo.list_calls(), 1);
}

#[tokio::test]
async fn broken_cache_degrades_to_the_store() {
    let repo = counting_repository().await;
    let service = CountryService::new(Arc::clone(&repo), BrokenCache);

    let chile = service.create("Chile").await.expect("create despite cache outage");
    assert_eq!(service.list().await.expect("list"), vec![chile.clone()]);
    assert_eq!(service.list().await.expect("list"), vec![chile.clone()]);
    assert_eq!(repo.list_calls(), 2);

    service.update(&chile.id, "Chilito").await.expect("update despite cache outage");
    service.delete(&chile.id).await.expect("delete despite cache outage");
}

#[tokio::test]
async fn corrupt_cache_entry_is_ignored() {
    let repo = counting_repository().await;
    let cache = MemoryCache::builder().build();
    let service = CountryService::new(Arc::clone(&repo), cache.clone());

    cache.set(COUNTRIES_CACHE_KEY, "{not json".to_owned()).await.expect("seed cache");
    assert!(service.list().await.expect("list").is_empty());
    assert_eq!(repo.list_calls(), 1);
}

#[tokio::test]
async fn disabled_cache_always_reads_the_store() {
    let repo = counting_repository().await;
    let service = CountryService::new(Arc::clone(&repo), CacheHandle::Disabled);

    service.list().await.expect("list");
    service.list().await.expect("list");
    assert_eq!(repo.list_calls(), 2);
}

#[tokio::test]
async fn get_passes_through() {
    let repo = counting_repository().await;
    let service = CountryService::new(repo, CacheHandle::Disabled);

    let created = service.create("Chile").await.expect("create");
    assert_eq!(service.get(&created.id).await.expect("get"), Some(created));
    assert_eq!(service.get("missing").await.expect("get"), None);
}

#[tokio::test]
async fn list_racing_a_mutation_does_not_cache_its_snapshot() {
    let repo = Arc::new(PausingRepository::new(surreal_repository().await));
    let service =
        Arc::new(CountryService::new(Arc::clone(&repo), MemoryCache::builder().build()));

    repo.pause_next.store(true, Ordering::SeqCst);
    let in_flight = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.list().await }
    });

    repo.read_done.notified().await;
    let peru = service.create("Peru").await.expect("create");
    repo.resume.notify_one();

    let snapshot = in_flight.await.expect("list task").expect("in-flight list");
    assert!(snapshot.is_empty(), "in-flight list read the store before the create");

    assert_eq!(service.list().await.expect("list after create"), vec![peru.clone()]);
    assert_eq!(service.list().await.expect("cached list"), vec![peru]);
}
