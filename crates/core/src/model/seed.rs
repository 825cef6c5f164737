use serde::{Deserialize, Serialize};

use crate::model::card::Card;
use crate::model::ids::CardId;

/// Authoritative `{id, front, back}` record from the bundled dataset.
///
/// This is also the export shape: converting a `Card` back into a `SeedCard`
/// drops the learner's bookkeeping (`status`, `isEdited`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCard {
    pub id: CardId,
    pub front: String,
    pub back: String,
}

impl SeedCard {
    #[must_use]
    pub fn new(id: u64, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: CardId::new(id),
            front: front.into(),
            back: back.into(),
        }
    }

    /// Materialize a card with no status.
    #[must_use]
    pub fn into_card(self) -> Card {
        Card::new(self.id, self.front, self.back)
    }
}

impl From<&Card> for SeedCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id(),
            front: card.front().to_owned(),
            back: card.back().to_owned(),
        }
    }
}
