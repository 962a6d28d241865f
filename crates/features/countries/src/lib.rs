//! Country registry slice.
//!
//! * [`domain`]: the `Country` entity, the [`CountryRepository`](domain::repo::CountryRepository)
//!   contract and the cached use-cases in [`CountryService`](domain::service::CountryService).
//! * [`infra`]: the `SurrealDB` repository, its schema and startup seeding.
//! * `api::rest` (feature `server`): axum handlers and their `OpenAPI` description.

#[cfg(feature = "server")]
pub mod api;
pub mod domain;
mod error;
pub mod infra;

pub use domain::model::{Country, CountryName};
pub use domain::repo::CountryRepository;
pub use domain::service::CountryService;
pub use error::{
    CountryError, CountryErrorExt, DUPLICATE_NAME_MESSAGE, DUPLICATE_OTHER_NAME_MESSAGE,
    EMPTY_NAME_MESSAGE, NOT_FOUND_MESSAGE,
};
pub use infra::MIGRATIONS;
pub use infra::surreal_repo::SurrealCountryRepository;

use atlas_cache::CacheHandle;
use atlas_database::Database;
use atlas_kernel::domain::config::ApiConfig;
use std::sync::Arc;
use tracing::info;

/// The service wired for production.
pub type Countries = CountryService<SurrealCountryRepository, CacheHandle>;

/// Builds the slice over an open database, seeding it when configured.
///
/// The database must already carry [`MIGRATIONS`].
///
/// # Errors
/// Returns an error if seeding fails.
pub async fn init(
    config: &ApiConfig,
    db: &Database,
    cache: CacheHandle,
) -> Result<Arc<Countries>, CountryError> {
    let repo = Arc::new(SurrealCountryRepository::new(db.clone()));

    if config.database.seed {
        infra::seed::seed(repo.as_ref()).await?;
    }

    info!(cache = cache.is_enabled(), "Countries slice initialized");
    Ok(Arc::new(CountryService::new(repo, cache)))
}
