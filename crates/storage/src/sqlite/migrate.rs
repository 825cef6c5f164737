use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::SqliteInitError;

/// Schema version written by the newest migration step.
pub const LATEST_SCHEMA_VERSION: i64 = 2;

/// Applies every schema version not yet recorded in `schema_migrations`.
///
/// Each version runs once, inside its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    run_migrations_up_to(pool, LATEST_SCHEMA_VERSION).await
}

pub(crate) async fn run_migrations_up_to(
    pool: &SqlitePool,
    target: i64,
) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    ensure_migrations_table(pool).await?;

    // Version 1: cards keyed by id, status index, session state scalars.
    if target >= 1 && !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS flashcards (
                    id INTEGER PRIMARY KEY,
                    front TEXT NOT NULL,
                    back TEXT NOT NULL,
                    status TEXT CHECK (status IN ('known', 'unknown', 'reviewSoon', 'dontShow'))
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_flashcards_status
                    ON flashcards(status);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS session_state (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        record_version(&mut tx, 1).await?;
        tx.commit().await?;
    }

    // Version 2: edited flag, backfilled for rows written under version 1.
    if target >= 2 && !is_applied(pool, 2).await? {
        let mut tx = pool.begin().await?;

        sqlx::query("ALTER TABLE flashcards ADD COLUMN is_edited INTEGER DEFAULT 0;")
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE flashcards SET is_edited = 0 WHERE is_edited IS NULL;")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_flashcards_is_edited
                    ON flashcards(is_edited);
            ",
        )
        .execute(&mut *tx)
        .await?;

        record_version(&mut tx, 2).await?;
        tx.commit().await?;
    }

    Ok(())
}

pub(crate) async fn current_version(pool: &SqlitePool) -> Result<Option<i64>, SqliteInitError> {
    ensure_migrations_table(pool).await?;
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

async fn ensure_migrations_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn record_version(tx: &mut Transaction<'_, Sqlite>, version: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(version)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
