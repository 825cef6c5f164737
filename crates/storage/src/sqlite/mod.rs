use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::repository::{CardRepository, SessionStateRepository, Storage, StorageError};

mod card_repo;
mod mapping;
mod migrate;
mod state_repo;

pub use migrate::LATEST_SCHEMA_VERSION;

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<SqliteInitError> for StorageError {
    fn from(err: SqliteInitError) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

static SHARED: OnceCell<SqliteRepository> = OnceCell::const_new();

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// connection pragmas fail during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Process-wide handle, connected and migrated on first use and never closed.
    ///
    /// Only the first caller's URL is used; later calls get the same handle.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the first connection or migration fails.
    /// A failed attempt leaves the cell empty so a later call can retry.
    pub async fn shared(database_url: &str) -> Result<&'static Self, SqliteInitError> {
        SHARED
            .get_or_try_init(|| async {
                let repo = Self::connect(database_url).await?;
                repo.migrate().await?;
                Ok::<_, SqliteInitError>(repo)
            })
            .await
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply every pending schema version.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Highest schema version recorded in this database, if any.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the migrations table cannot be read.
    pub async fn schema_version(&self) -> Result<Option<i64>, SqliteInitError> {
        migrate::current_version(&self.pool).await
    }

    fn into_storage(self) -> Storage {
        let cards: Arc<dyn CardRepository> = Arc::new(self.clone());
        let state: Arc<dyn SessionStateRepository> = Arc::new(self);
        Storage { cards, state }
    }
}

impl Storage {
    /// Build a `Storage` backed by a fresh `SQLite` connection.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo.into_storage())
    }

    /// Build a `Storage` over the process-wide `SQLite` handle.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the shared handle cannot be opened.
    pub async fn shared_sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::shared(database_url).await?;
        Ok(repo.clone().into_storage())
    }
}
