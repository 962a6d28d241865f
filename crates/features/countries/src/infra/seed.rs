use crate::domain::repo::CountryRepository;
use crate::error::CountryError;
use tracing::info;

/// Sample data for a fresh installation.
pub const SEED_COUNTRIES: [&str; 3] = ["Argentina", "Chile", "Colombia"];

/// Inserts [`SEED_COUNTRIES`] when the repository is empty; returns how many were added.
///
/// # Errors
/// Propagates the first repository failure.
pub async fn seed<R: CountryRepository>(repo: &R) -> Result<usize, CountryError> {
    if !repo.get_all().await?.is_empty() {
        info!("Countries already present, skipping seed");
        return Ok(0);
    }

    for name in SEED_COUNTRIES {
        repo.create(name).await?;
    }
    info!(count = SEED_COUNTRIES.len(), "Countries seeded");
    Ok(SEED_COUNTRIES.len())
}
