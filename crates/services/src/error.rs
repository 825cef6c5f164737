//! Shared error types for the services crate.

use std::path::PathBuf;

use flashdeck_core::model::CardId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use thiserror::Error;

/// The seed dataset could not be loaded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error("failed to read seed dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("seed dataset is not valid card JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed dataset repeats card id {0}")]
    DuplicateId(CardId),
}

/// Errors emitted by `DeckService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeckError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to export deck: {0}")]
    Export(#[source] serde_json::Error),
}

impl From<SqliteInitError> for DeckError {
    fn from(err: SqliteInitError) -> Self {
        DeckError::Storage(err.into())
    }
}
