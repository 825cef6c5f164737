use async_trait::async_trait;
use flashdeck_core::model::{Card, CardId, CardStatus};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The backing store failed or could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── CARD STORE ────────────────────────────────────────────────────────────────
//

/// Durable card records keyed by `CardId`.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Every stored card. Order is not meaningful; callers impose deck order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be read.
    async fn get_all(&self) -> Result<Vec<Card>, StorageError>;

    /// Fetch a single card.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get(&self, id: CardId) -> Result<Option<Card>, StorageError>;

    /// Cards carrying the given status.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn with_status(&self, status: CardStatus) -> Result<Vec<Card>, StorageError>;

    /// Insert or fully replace the card with the same id. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the card cannot be stored.
    async fn put(&self, card: &Card) -> Result<(), StorageError>;

    /// Store several cards. Backends that can should make this all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any card cannot be stored.
    async fn put_many(&self, cards: &[Card]) -> Result<(), StorageError> {
        for card in cards {
            self.put(card).await?;
        }
        Ok(())
    }

    /// Remove every card.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear_all(&self) -> Result<(), StorageError>;
}

//
// ─── SESSION STATE STORE ───────────────────────────────────────────────────────
//

/// The scalars kept between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    CurrentCardId,
    NextReviewCardId,
    ShuffledIds,
}

impl StateKey {
    pub const ALL: [StateKey; 3] = [
        StateKey::CurrentCardId,
        StateKey::NextReviewCardId,
        StateKey::ShuffledIds,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::CurrentCardId => "currentCardId",
            StateKey::NextReviewCardId => "nextReviewCardId",
            StateKey::ShuffledIds => "shuffledIds",
        }
    }
}

/// Scalar key-value storage for positional bookkeeping.
///
/// Values are JSON. `None` means absent; writing `None` clears the key.
#[async_trait]
pub trait SessionStateRepository: Send + Sync {
    /// Read a raw value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_state(&self, key: StateKey) -> Result<Option<Value>, StorageError>;

    /// Overwrite (or clear, with `None`) a raw value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn set_state(&self, key: StateKey, value: Option<Value>) -> Result<(), StorageError>;

    /// Resume pointer for the review view.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    async fn current_card_id(&self) -> Result<Option<CardId>, StorageError> {
        decode(StateKey::CurrentCardId, self.get_state(StateKey::CurrentCardId).await?)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn set_current_card_id(&self, id: Option<CardId>) -> Result<(), StorageError> {
        self.set_state(StateKey::CurrentCardId, id.map(|id| Value::from(id.value())))
            .await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    async fn next_review_card_id(&self) -> Result<Option<CardId>, StorageError> {
        decode(
            StateKey::NextReviewCardId,
            self.get_state(StateKey::NextReviewCardId).await?,
        )
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn set_next_review_card_id(&self, id: Option<CardId>) -> Result<(), StorageError> {
        self.set_state(
            StateKey::NextReviewCardId,
            id.map(|id| Value::from(id.value())),
        )
        .await
    }

    /// Persisted shuffle order; empty when none was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    async fn deck_order(&self) -> Result<Vec<CardId>, StorageError> {
        let ids = decode(StateKey::ShuffledIds, self.get_state(StateKey::ShuffledIds).await?)?;
        Ok(ids.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn set_deck_order(&self, ids: &[CardId]) -> Result<(), StorageError> {
        let value =
            serde_json::to_value(ids).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.set_state(StateKey::ShuffledIds, Some(value)).await
    }

    /// Clear every key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear_all(&self) -> Result<(), StorageError> {
        for key in StateKey::ALL {
            self.set_state(key, None).await?;
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(key: StateKey, value: Option<Value>) -> Result<Option<T>, StorageError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", key.as_str()))),
    }
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    cards: Arc<Mutex<BTreeMap<CardId, Card>>>,
    state: Arc<Mutex<HashMap<StateKey, Value>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Unavailable(e.to_string())
}

#[async_trait]
impl CardRepository for InMemoryRepository {
    async fn get_all(&self) -> Result<Vec<Card>, StorageError> {
        let guard = self.cards.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    async fn get(&self, id: CardId) -> Result<Option<Card>, StorageError> {
        let guard = self.cards.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn with_status(&self, status: CardStatus) -> Result<Vec<Card>, StorageError> {
        let guard = self.cards.lock().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|card| card.status() == status)
            .cloned()
            .collect())
    }

    async fn put(&self, card: &Card) -> Result<(), StorageError> {
        let mut guard = self.cards.lock().map_err(poisoned)?;
        guard.insert(card.id(), card.clone());
        Ok(())
    }

    async fn put_many(&self, cards: &[Card]) -> Result<(), StorageError> {
        let mut guard = self.cards.lock().map_err(poisoned)?;
        guard.extend(cards.iter().map(|card| (card.id(), card.clone())));
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        let mut guard = self.cards.lock().map_err(poisoned)?;
        guard.clear();
        Ok(())
    }
}

#[async_trait]
impl SessionStateRepository for InMemoryRepository {
    async fn get_state(&self, key: StateKey) -> Result<Option<Value>, StorageError> {
        let guard = self.state.lock().map_err(poisoned)?;
        Ok(guard.get(&key).cloned())
    }

    async fn set_state(&self, key: StateKey, value: Option<Value>) -> Result<(), StorageError> {
        let mut guard = self.state.lock().map_err(poisoned)?;
        match value {
            Some(value) => {
                guard.insert(key, value);
            }
            None => {
                guard.remove(&key);
            }
        }
        Ok(())
    }
}

/// Card and session-state repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub cards: Arc<dyn CardRepository>,
    pub state: Arc<dyn SessionStateRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let cards: Arc<dyn CardRepository> = Arc::new(repo.clone());
        let state: Arc<dyn SessionStateRepository> = Arc::new(repo);
        Self { cards, state }
    }
}
