use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use flashdeck_core::model::{Card, CardId, CardStatus, SeedCard};
use flashdeck_core::{ReviewSession, SessionAction, shuffle};
use storage::repository::{CardRepository, SessionStateRepository, Storage};
use tracing::{debug, info, warn};

use crate::error::DeckError;
use crate::export::export_cards;
use crate::seed::SeedProvider;

/// Establishes, restores and merges the learner's deck, and persists
/// progress as the learner moves through it.
///
/// Sessions are passed in by reference and returned updated, so a failed
/// write leaves the caller holding the last good session.
#[derive(Clone)]
pub struct DeckService {
    cards: Arc<dyn CardRepository>,
    state: Arc<dyn SessionStateRepository>,
    seed: Arc<dyn SeedProvider>,
}

impl DeckService {
    #[must_use]
    pub fn new(
        cards: Arc<dyn CardRepository>,
        state: Arc<dyn SessionStateRepository>,
        seed: Arc<dyn SeedProvider>,
    ) -> Self {
        Self { cards, state, seed }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, seed: Arc<dyn SeedProvider>) -> Self {
        Self::new(
            Arc::clone(&storage.cards),
            Arc::clone(&storage.state),
            seed,
        )
    }

    /// Load the deck for a new session.
    ///
    /// With both a stored order and stored cards, the prior shuffle is rebuilt
    /// as-is. Otherwise any stored cards are dropped and the seed dataset is
    /// shuffled, written and its order persisted. The resume position is then
    /// resolved from the stored pointers.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the store cannot be read or written.
    /// Returns `DeckError::Seed` if seeding is needed and the dataset cannot be loaded.
    pub async fn initialize(&self) -> Result<ReviewSession, DeckError> {
        let (current_id, next_review_id, order, stored) = tokio::try_join!(
            self.state.current_card_id(),
            self.state.next_review_card_id(),
            self.state.deck_order(),
            self.cards.get_all(),
        )?;

        let deck = if !order.is_empty() && !stored.is_empty() {
            info!(cards = stored.len(), "restoring persisted deck order");
            restore_order(&order, stored)
        } else {
            info!(
                stored_cards = stored.len(),
                stored_order = order.len(),
                "no persisted deck, seeding"
            );
            let seeds = self.seed.load()?;
            if !stored.is_empty() {
                warn!(count = stored.len(), "discarding stored cards that have no deck order");
                self.cards.clear_all().await?;
            }
            self.seed_store(seeds).await?
        };

        let session = ReviewSession::resume(deck, current_id, next_review_id);
        if session.is_empty() {
            warn!("deck is empty after initialization");
        }
        Ok(session)
    }

    /// Wipe all cards and session state, then seed from scratch.
    ///
    /// The dataset is loaded before anything is cleared, so a bad seed leaves
    /// the store untouched.
    ///
    /// # Errors
    ///
    /// Returns `DeckError` if the seed cannot be loaded or storage fails.
    pub async fn reset(&self) -> Result<ReviewSession, DeckError> {
        let seeds = self.seed.load()?;
        self.cards.clear_all().await?;
        self.state.clear_all().await?;
        info!("cleared cards and session state");

        let deck = self.seed_store(seeds).await?;
        Ok(ReviewSession::resume(deck, None, None))
    }

    /// Add seed cards that are not stored yet, then reshuffle the whole set.
    ///
    /// Cards already stored are never overwritten. The session restarts at the
    /// front of the new order.
    ///
    /// # Errors
    ///
    /// Returns `DeckError` if the seed cannot be loaded or storage fails.
    pub async fn merge(&self) -> Result<ReviewSession, DeckError> {
        let seeds = self.seed.load()?;
        let existing: HashSet<CardId> = self
            .cards
            .get_all()
            .await?
            .iter()
            .map(Card::id)
            .collect();

        let new_cards: Vec<Card> = seeds
            .into_iter()
            .filter(|seed| !existing.contains(&seed.id))
            .map(SeedCard::into_card)
            .collect();
        let added = new_cards.len();
        debug!(added, "adding new seed cards");
        // One batch: either every new card lands or none does.
        if !new_cards.is_empty() {
            self.cards.put_many(&new_cards).await?;
        }

        let all = self.cards.get_all().await?;
        let deck = shuffle(&all);
        let ids: Vec<CardId> = deck.iter().map(Card::id).collect();
        self.state.set_deck_order(&ids).await?;

        let next_review_id = self.state.next_review_card_id().await?;
        let session = ReviewSession::resume(deck, None, next_review_id);
        self.state
            .set_current_card_id(session.current_card().map(Card::id))
            .await?;

        info!(added, total = session.len(), "merged seed dataset");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the resume pointer cannot be saved.
    pub async fn go_next(&self, session: &ReviewSession) -> Result<ReviewSession, DeckError> {
        self.navigate(session, SessionAction::GoNext).await
    }

    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the resume pointer cannot be saved.
    pub async fn go_previous(&self, session: &ReviewSession) -> Result<ReviewSession, DeckError> {
        self.navigate(session, SessionAction::GoPrevious).await
    }

    /// Jump to a specific card. Unknown ids leave the position unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the resume pointer cannot be saved.
    pub async fn select(
        &self,
        session: &ReviewSession,
        id: CardId,
    ) -> Result<ReviewSession, DeckError> {
        self.navigate(session, SessionAction::Select(id)).await
    }

    async fn navigate(
        &self,
        session: &ReviewSession,
        action: SessionAction,
    ) -> Result<ReviewSession, DeckError> {
        let next = session.clone().apply(action);
        if let Some(card) = next.current_card() {
            debug!(card = %card.id(), index = next.current_index(), "moved");
            self.state.set_current_card_id(Some(card.id())).await?;
        }
        Ok(next)
    }

    /// Persist `card` and reflect it in the session.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the card cannot be stored.
    pub async fn update_card(
        &self,
        session: &ReviewSession,
        card: Card,
    ) -> Result<ReviewSession, DeckError> {
        self.cards.put(&card).await?;
        debug!(card = %card.id(), status = %card.status(), "stored card");
        Ok(session.clone().apply(SessionAction::UpdateCard(card)))
    }

    /// Tag the current card. A no-op on an empty session.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the card cannot be stored.
    pub async fn set_status(
        &self,
        session: &ReviewSession,
        status: CardStatus,
    ) -> Result<ReviewSession, DeckError> {
        let Some(card) = session.current_card().cloned() else {
            return Ok(session.clone());
        };
        self.update_card(session, card.with_status(status)).await
    }

    /// Overwrite the current card's text. A no-op on an empty session.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the card cannot be stored.
    pub async fn edit_card(
        &self,
        session: &ReviewSession,
        front: Option<String>,
        back: Option<String>,
    ) -> Result<ReviewSession, DeckError> {
        let Some(card) = session.current_card().cloned() else {
            return Ok(session.clone());
        };
        let front = front.unwrap_or_else(|| card.front().to_owned());
        let back = back.unwrap_or_else(|| card.back().to_owned());
        self.update_card(session, card.edit(front, back)).await
    }

    /// Stored cards with the given status, by id.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the store cannot be read.
    pub async fn cards_with_status(&self, status: CardStatus) -> Result<Vec<Card>, DeckError> {
        Ok(self.cards.with_status(status).await?)
    }

    /// Write the reserved review pointer. Navigation never reads it.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Storage` if the pointer cannot be saved.
    pub async fn set_next_review_card(&self, id: Option<CardId>) -> Result<(), DeckError> {
        self.state.set_next_review_card_id(id).await?;
        Ok(())
    }

    /// The session's deck, in presentation order, as seed-shaped JSON.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Export` if serialization fails.
    pub fn export(&self, session: &ReviewSession) -> Result<String, DeckError> {
        export_cards(session.deck())
    }

    async fn seed_store(&self, seeds: Vec<SeedCard>) -> Result<Vec<Card>, DeckError> {
        let cards: Vec<Card> = seeds.into_iter().map(SeedCard::into_card).collect();
        let deck = shuffle(&cards);

        self.cards.put_many(&cards).await?;
        let ids: Vec<CardId> = deck.iter().map(Card::id).collect();
        self.state.set_deck_order(&ids).await?;

        info!(cards = ids.len(), "seeded deck");
        Ok(deck)
    }
}

fn restore_order(order: &[CardId], stored: Vec<Card>) -> Vec<Card> {
    let mut by_id: HashMap<CardId, Card> = stored.into_iter().map(|c| (c.id(), c)).collect();
    let mut deck = Vec::with_capacity(order.len());
    for id in order {
        match by_id.remove(id) {
            Some(card) => deck.push(card),
            None => warn!(card = %id, "deck order entry has no stored card, skipping"),
        }
    }
    if !by_id.is_empty() {
        warn!(count = by_id.len(), "stored cards are missing from the deck order");
    }
    deck
}
