//! # Database Infrastructure
//!
//! Initializes and shares the [SurrealDB](https://surrealdb.com) connection used across the workspace.
//!
//! ## Key Features
//! - **Engine Agnostic**: Supports `mem://`, `rocksdb://`, `ws://`, and `http://` via the `any` engine.
//! - **Resilient Connectivity**: Built-in retry logic for health checks during engine startup.
//! - **Schema Migrations**: Feature slices hand in versioned scripts; each is applied once and
//!   pinned by checksum.
//! - **Bounded Queries**: [`Database::bounded`] enforces the configured per-query deadline.
//!
//! ## Example
//!
//! ```rust
//! use atlas_database::{Database, DatabaseError, Migration};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("atlas", "countries")
//!         .migrations([Migration::new("demo", "0001-init", "DEFINE TABLE demo SCHEMALESS;")])
//!         .init()
//!         .await?;
//!
//!     let _version = db.version().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod migrations;

pub use error::{DatabaseError, DatabaseErrorExt};
pub use migrations::{Migration, MigrationReport};

use migrations::MigrationRunner;
use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{info, instrument, warn};

const HEALTH_ATTEMPTS: u32 = 3;
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Inner state of the [`Database`] wrapper.
#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    query_timeout: Duration,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// `SurrealDB` client wrapper that provides thread-safety and contextual error handling.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Creates a new [`DatabaseBuilder`].
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Deadline applied by [`Database::bounded`].
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        self.inner.query_timeout
    }

    /// Runs a store call under the configured deadline.
    ///
    /// # Errors
    /// * [`DatabaseError::Timeout`] when the deadline elapses first.
    /// * [`DatabaseError::Surreal`] when the call itself fails.
    pub async fn bounded<T, F>(
        &self,
        context: &'static str,
        operation: F,
    ) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, surrealdb::Error>>,
    {
        let timeout = self.inner.query_timeout;
        match tokio::time::timeout(timeout, operation).await {
            Ok(result) => result.context(context),
            Err(_) => Err(DatabaseError::Timeout {
                elapsed_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                context: Some(context.into()),
            }),
        }
    }

    /// Applies `migrations` that have not been recorded yet.
    ///
    /// # Errors
    /// * [`DatabaseError::Migration`] when a recorded migration changed since it was applied.
    /// * [`DatabaseError::Surreal`] when a script fails; the failing script is rolled back.
    pub async fn migrate(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        MigrationRunner::new(&self.inner.instance).run(migrations).await
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// A fluent builder for configuring and establishing a `SurrealDB` connection.
///
/// This builder ensures that fundamental parameters like the connection URL,
/// namespace, and database name are provided upfront.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
    query_timeout: Duration,
    migrations: Vec<Migration>,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self {
            url: None,
            ns: None,
            db: None,
            auth: None,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            migrations: Vec::new(),
        }
    }
}

impl DatabaseBuilder {
    /// Creates a new [`DatabaseBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Add root credentials to the connection.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Per-query deadline used by [`Database::bounded`].
    pub const fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Schema scripts applied right after the session is activated.
    pub fn migrations(mut self, migrations: impl IntoIterator<Item = Migration>) -> Self {
        self.migrations.extend(migrations);
        self
    }

    /// Consumes the builder and attempts to establish a connection to the database.
    ///
    /// # Process
    /// 1. **Validation**: Ensures URL, Namespace, and Database name are provided.
    /// 2. **Engine Initialization**: Connects to the underlying `SurrealDB` engine (Any).
    /// 3. **Resilience**: Performs up to 3 health checks. If one fails, it retries with
    ///    exponential backoff (starting at 500ms).
    /// 4. **Authentication**: If credentials were provided via [`auth`](Self::auth), signs in as a Root user.
    /// 5. **Session Activation**: Sets the namespace and database for the connection.
    /// 6. **Migrations**: Applies pending schema scripts.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if required parameters are missing or the timeout is zero.
    /// * [`DatabaseError::Connection`] if the engine fails to start or remains unhealthy.
    /// * [`DatabaseError::Auth`] if the provided credentials are rejected.
    /// * [`DatabaseError::Surreal`] if session activation fails.
    /// * [`DatabaseError::Migration`] if an applied migration no longer matches its checksum.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = self.url.ok_or(DatabaseError::Validation {
            message: "URL is required".into(),
            context: None,
        })?;
        let ns = self.ns.ok_or(DatabaseError::Validation {
            message: "Namespace is required".into(),
            context: None,
        })?;
        let db = self.db.ok_or(DatabaseError::Validation {
            message: "Database is required".into(),
            context: None,
        })?;
        if self.query_timeout.is_zero() {
            return Err(DatabaseError::Validation {
                message: "Query timeout must be greater than zero".into(),
                context: None,
            });
        }

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Initializing engine".into()),
        })?;

        let mut delay = Duration::from_millis(500);
        for attempt in 1..=HEALTH_ATTEMPTS {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == HEALTH_ATTEMPTS {
                return Err(DatabaseError::Connection {
                    message: "Unhealthy after retries".into(),
                    context: Some(url.into()),
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        if let Some((username, password)) = self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth { message: e.to_string().into(), context: Some(url.into()) }
            })?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        let database = Database {
            inner: Arc::new(DatabaseInner { instance, query_timeout: self.query_timeout, ns, db }),
        };

        if !self.migrations.is_empty() {
            let report = database.migrate(&self.migrations).await?;
            info!(
                applied = report.applied.len(),
                skipped = report.skipped.len(),
                "Database migrations up to date"
            );
        }

        Ok(database)
    }
}
