use super::model::Country;
use crate::error::CountryError;
use std::future::Future;
use std::sync::Arc;

/// Persistence for countries.
///
/// Implementations enforce the invariants themselves: a blank name is a
/// `Validation` error and a name equal to another record's, ignoring case, is a
/// `Conflict`. A missing id is `Ok(None)` for reads and `NotFound` for writes.
pub trait CountryRepository: Send + Sync {
    /// Every stored country; order is store-defined.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Country>, CountryError>> + Send;

    fn get_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Country>, CountryError>> + Send;

    fn create(&self, name: &str) -> impl Future<Output = Result<Country, CountryError>> + Send;

    /// Renames `id`. Keeping the current name, in any casing, is allowed.
    fn update(
        &self,
        id: &str,
        name: &str,
    ) -> impl Future<Output = Result<Country, CountryError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), CountryError>> + Send;
}

impl<R: CountryRepository> CountryRepository for Arc<R> {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Country>, CountryError>> + Send {
        (**self).get_all()
    }

    fn get_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Country>, CountryError>> + Send {
        (**self).get_by_id(id)
    }

    fn create(&self, name: &str) -> impl Future<Output = Result<Country, CountryError>> + Send {
        (**self).create(name)
    }

    fn update(
        &self,
        id: &str,
        name: &str,
    ) -> impl Future<Output = Result<Country, CountryError>> + Send {
        (**self).update(id, name)
    }

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), CountryError>> + Send {
        (**self).delete(id)
    }
}
