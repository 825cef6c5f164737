use async_trait::async_trait;
use flashdeck_core::model::{Card, CardId, CardStatus};
use sqlx::{Executor, Sqlite};

use super::SqliteRepository;
use super::mapping::{card_id_to_i64, map_card_row, unavailable};
use crate::repository::{CardRepository, StorageError};

const SELECT_CARDS: &str = r"
    SELECT id, front, back, status, is_edited
    FROM flashcards
";

async fn upsert_with<'e, E>(executor: E, card: &Card) -> Result<(), StorageError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO flashcards (id, front, back, status, is_edited)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            front = excluded.front,
            back = excluded.back,
            status = excluded.status,
            is_edited = excluded.is_edited
        ",
    )
    .bind(card_id_to_i64(card.id())?)
    .bind(card.front().to_owned())
    .bind(card.back().to_owned())
    .bind(card.status().as_str())
    .bind(card.is_edited())
    .execute(executor)
    .await
    .map_err(unavailable)?;
    Ok(())
}

#[async_trait]
impl CardRepository for SqliteRepository {
    async fn get_all(&self) -> Result<Vec<Card>, StorageError> {
        let rows = sqlx::query(&format!("{SELECT_CARDS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        rows.iter().map(map_card_row).collect()
    }

    async fn get(&self, id: CardId) -> Result<Option<Card>, StorageError> {
        let row = sqlx::query(&format!("{SELECT_CARDS} WHERE id = ?1"))
            .bind(card_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        row.as_ref().map(map_card_row).transpose()
    }

    async fn with_status(&self, status: CardStatus) -> Result<Vec<Card>, StorageError> {
        let rows = match status.as_str() {
            Some(tag) => {
                sqlx::query(&format!("{SELECT_CARDS} WHERE status = ?1 ORDER BY id"))
                    .bind(tag)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query(&format!("{SELECT_CARDS} WHERE status IS NULL ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(unavailable)?;
        rows.iter().map(map_card_row).collect()
    }

    async fn put(&self, card: &Card) -> Result<(), StorageError> {
        upsert_with(&self.pool, card).await
    }

    async fn put_many(&self, cards: &[Card]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;
        for card in cards {
            upsert_with(&mut *tx, card).await?;
        }
        tx.commit().await.map_err(unavailable)?;
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM flashcards")
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
