use flashdeck_core::model::{Card, CardId, CardStatus};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn unavailable<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Unavailable(e.to_string())
}

pub(crate) fn card_id_from_i64(v: i64) -> Result<CardId, StorageError> {
    u64::try_from(v)
        .map(CardId::new)
        .map_err(|_| StorageError::Serialization(format!("card_id sign overflow: {v}")))
}

pub(crate) fn card_id_to_i64(id: CardId) -> Result<i64, StorageError> {
    i64::try_from(id.value())
        .map_err(|_| StorageError::Serialization(format!("card_id overflow: {id}")))
}

/// Maps a `flashcards` row; a NULL `is_edited` reads as `false`.
pub(crate) fn map_card_row(row: &sqlx::sqlite::SqliteRow) -> Result<Card, StorageError> {
    let id = card_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let front: String = row.try_get("front").map_err(ser)?;
    let back: String = row.try_get("back").map_err(ser)?;
    let status_raw: Option<String> = row.try_get("status").map_err(ser)?;
    let status = CardStatus::from_persisted(status_raw.as_deref()).map_err(ser)?;
    let is_edited: Option<bool> = row.try_get("is_edited").map_err(ser)?;

    Ok(Card::from_persisted(
        id,
        front,
        back,
        status,
        is_edited.unwrap_or(false),
    ))
}
