use super::model::Country;
use super::repo::CountryRepository;
use crate::error::CountryError;
use atlas_cache::{CacheStore, CacheStoreExt};
use atlas_kernel::domain::constants::COUNTRIES_CACHE_KEY;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument, warn};

/// Country use-cases.
///
/// Each operation is one repository call. `list` is read-through cached under
/// [`COUNTRIES_CACHE_KEY`] and every successful mutation drops that key. The cache
/// is best-effort: its failures are logged and behave like a miss.
///
/// A list that read the store before a mutation committed never leaves its
/// snapshot cached: every invalidation bumps `generation`, and `list` only keeps
/// what it wrote if the generation it started from is still current.
#[derive(Debug)]
pub struct CountryService<R, C> {
    repo: Arc<R>,
    cache: C,
    generation: AtomicU64,
}

impl<R, C> CountryService<R, C>
where
    R: CountryRepository,
    C: CacheStore,
{
    pub const fn new(repo: Arc<R>, cache: C) -> Self {
        Self { repo, cache, generation: AtomicU64::new(0) }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Country>, CountryError> {
        match self.cache.get_json::<Vec<Country>>(COUNTRIES_CACHE_KEY).await {
            Ok(Some(countries)) => {
                debug!(count = countries.len(), "Countries served from cache");
                return Ok(countries);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache read failed, querying the store"),
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let countries = self.repo.get_all().await?;
        self.fill(generation, &countries).await;
        Ok(countries)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Country>, CountryError> {
        self.repo.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<Country, CountryError> {
        let country = self.repo.create(name).await?;
        self.invalidate().await;
        Ok(country)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: &str, name: &str) -> Result<Country, CountryError> {
        let country = self.repo.update(id, name).await?;
        self.invalidate().await;
        Ok(country)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), CountryError> {
        self.repo.delete(id).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Caches a snapshot read at `generation`, unless a mutation has landed since.
    async fn fill(&self, generation: u64, countries: &[Country]) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Store changed during list, snapshot not cached");
            return;
        }
        if let Err(e) = self.cache.set_json(COUNTRIES_CACHE_KEY, &countries).await {
            warn!(error = %e, "Cache write failed");
            return;
        }
        // A mutation may have invalidated between the check and the write.
        if self.generation.load(Ordering::SeqCst) != generation {
            self.invalidate_key().await;
        }
    }

    async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.invalidate_key().await;
    }

    async fn invalidate_key(&self) {
        if let Err(e) = self.cache.delete(COUNTRIES_CACHE_KEY).await {
            warn!(error = %e, "Cache invalidation failed, list may be stale until the entry expires");
        }
    }
}
