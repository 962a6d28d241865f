use crate::domain::model::{Country, CountryName};
use crate::domain::repo::CountryRepository;
use crate::error::{CountryError, DUPLICATE_NAME_MESSAGE, DUPLICATE_OTHER_NAME_MESSAGE};
use atlas_database::{Database, DatabaseError};
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument};

/// A write that loses an optimistic race is re-checked and retried this many times in total.
const WRITE_ATTEMPTS: u32 = 3;

const SELECT_ALL: &str = "SELECT id.id() AS id, name FROM country ORDER BY id";
const SELECT_ONE: &str = "SELECT id.id() AS id, name FROM country WHERE id.id() = $id";
const SELECT_BY_KEY: &str = "SELECT id.id() AS id, name FROM country WHERE name_key = $name_key";
const INSERT: &str = "SELECT id.id() AS id, name FROM \
    (CREATE country:ulid() SET name = $name, name_key = $name_key)";
const RENAME: &str = "SELECT id.id() AS id, name FROM \
    (UPDATE country SET name = $name, name_key = $name_key WHERE id.id() = $id)";
const REMOVE: &str = "SELECT id.id() AS id, name FROM \
    (DELETE country WHERE id.id() = $id RETURN BEFORE)";

#[derive(Debug, SurrealValue)]
struct CountryRow {
    id: String,
    name: String,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Self { id: row.id, name: row.name }
    }
}

/// [`CountryRepository`] over the `country` table.
///
/// Record keys are ULIDs, so listing by id follows creation time at millisecond
/// resolution. Uniqueness is checked up front for a precise message and enforced
/// by the `name_key` index. A write that clashes with a concurrent transaction
/// repeats its checks, so the loser of a same-name race sees `Conflict`.
#[derive(Debug, Clone)]
pub struct SurrealCountryRepository {
    db: Database,
}

impl SurrealCountryRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    async fn find(&self, id: &str) -> Result<Option<Country>, CountryError> {
        let id = id.to_owned();
        let rows = self
            .db
            .bounded("Loading country", async {
                self.db.query(SELECT_ONE).bind(("id", id)).await?.take::<Vec<CountryRow>>(0)
            })
            .await?;
        Ok(rows.into_iter().next().map(Country::from))
    }

    /// Whether a record other than `except` already uses `name`, ignoring case.
    async fn name_taken(
        &self,
        name: &CountryName,
        except: Option<&str>,
    ) -> Result<bool, CountryError> {
        let rows = self
            .db
            .bounded("Checking name uniqueness", async {
                self.db
                    .query(SELECT_BY_KEY)
                    .bind(("name_key", name.key()))
                    .await?
                    .take::<Vec<CountryRow>>(0)
            })
            .await?;
        Ok(rows.iter().any(|row| Some(row.id.as_str()) != except))
    }

    async fn insert(&self, name: &CountryName) -> Result<Vec<CountryRow>, DatabaseError> {
        let (value, key) = (name.as_str().to_owned(), name.key());
        self.db
            .bounded("Creating country", async {
                self.db
                    .query(INSERT)
                    .bind(("name", value))
                    .bind(("name_key", key))
                    .await?
                    .take::<Vec<CountryRow>>(0)
            })
            .await
    }

    async fn rename(&self, id: &str, name: &CountryName) -> Result<Vec<CountryRow>, DatabaseError> {
        let (id, value, key) = (id.to_owned(), name.as_str().to_owned(), name.key());
        self.db
            .bounded("Renaming country", async {
                self.db
                    .query(RENAME)
                    .bind(("id", id))
                    .bind(("name", value))
                    .bind(("name_key", key))
                    .await?
                    .take::<Vec<CountryRow>>(0)
            })
            .await
    }
}

impl CountryRepository for SurrealCountryRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Country>, CountryError> {
        let rows = self
            .db
            .bounded("Listing countries", async {
                self.db.query(SELECT_ALL).await?.take::<Vec<CountryRow>>(0)
            })
            .await?;
        debug!(count = rows.len(), "Loaded countries");
        Ok(rows.into_iter().map(Country::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Option<Country>, CountryError> {
        self.find(id).await
    }

    #[instrument(skip(self))]
    async fn create(&self, name: &str) -> Result<Country, CountryError> {
        let name = CountryName::parse(name)?;

        let mut attempt = 1;
        let rows = loop {
            if self.name_taken(&name, None).await? {
                return Err(CountryError::duplicate(DUPLICATE_NAME_MESSAGE));
            }
            match self.insert(&name).await {
                Ok(rows) => break rows,
                Err(e) if e.is_write_conflict() && attempt < WRITE_ATTEMPTS => {
                    debug!(attempt, error = %e, "Write conflict on create, re-checking");
                    attempt += 1;
                }
                Err(e) => return Err(CountryError::from_store(e, DUPLICATE_NAME_MESSAGE)),
            }
        };

        rows.into_iter().next().map(Country::from).ok_or_else(|| CountryError::Internal {
            message: "Store returned no record after insert".into(),
            context: None,
        })
    }

    #[instrument(skip(self))]
    async fn update(&self, id: &str, name: &str) -> Result<Country, CountryError> {
        let name = CountryName::parse(name)?;

        let mut attempt = 1;
        let rows = loop {
            if self.find(id).await?.is_none() {
                return Err(CountryError::not_found());
            }
            if self.name_taken(&name, Some(id)).await? {
                return Err(CountryError::duplicate(DUPLICATE_OTHER_NAME_MESSAGE));
            }
            match self.rename(id, &name).await {
                Ok(rows) => break rows,
                Err(e) if e.is_write_conflict() && attempt < WRITE_ATTEMPTS => {
                    debug!(attempt, error = %e, "Write conflict on update, re-checking");
                    attempt += 1;
                }
                Err(e) => return Err(CountryError::from_store(e, DUPLICATE_OTHER_NAME_MESSAGE)),
            }
        };

        // Deleted between the existence check and the write.
        rows.into_iter().next().map(Country::from).ok_or_else(CountryError::not_found)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), CountryError> {
        let id = id.to_owned();
        let rows = self
            .db
            .bounded("Deleting country", async {
                self.db.query(REMOVE).bind(("id", id)).await?.take::<Vec<CountryRow>>(0)
            })
            .await?;

        if rows.is_empty() {
            return Err(CountryError::not_found());
        }
        Ok(())
    }
}
