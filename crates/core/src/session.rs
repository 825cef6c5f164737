use serde::{Deserialize, Serialize};

use crate::model::{Card, CardId, CardStatus};
use crate::navigation::{next_visible_index, previous_visible_index};

/// Learner input that moves or mutates a review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    GoNext,
    GoPrevious,
    /// Replace the card with the same id.
    UpdateCard(Card),
    /// Jump straight to a card, e.g. when opened from a list.
    Select(CardId),
}

/// In-memory deck plus the learner's position in it.
///
/// Sessions are plain values: every action produces the next session through
/// [`ReviewSession::apply`]. On an empty deck all actions are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    deck: Vec<Card>,
    current_index: usize,
    next_review_index: usize,
}

impl ReviewSession {
    /// Build a session over `deck`, resuming at the stored pointers.
    ///
    /// An unknown or absent `current` falls back to index 0, and the result is
    /// moved forward past hidden cards. `next_review` is a raw lookup with the
    /// same fallback but no skipping.
    #[must_use]
    pub fn resume(deck: Vec<Card>, current: Option<CardId>, next_review: Option<CardId>) -> Self {
        let start = current.and_then(|id| position_of(&deck, id)).unwrap_or(0);
        let current_index = next_visible_index(&deck, start).unwrap_or(0);
        let next_review_index = next_review
            .and_then(|id| position_of(&deck, id))
            .unwrap_or(0);
        Self {
            deck,
            current_index,
            next_review_index,
        }
    }

    #[must_use]
    pub fn apply(mut self, action: SessionAction) -> Self {
        if self.deck.is_empty() {
            return self;
        }

        match action {
            SessionAction::GoNext => {
                if let Some(index) = next_visible_index(&self.deck, self.current_index + 1) {
                    self.current_index = index;
                }
            }
            SessionAction::GoPrevious => {
                let start = isize::try_from(self.current_index).map_or(-1, |i| i - 1);
                if let Some(index) = previous_visible_index(&self.deck, start) {
                    self.current_index = index;
                }
            }
            SessionAction::UpdateCard(card) => {
                if let Some(index) = position_of(&self.deck, card.id()) {
                    self.deck[index] = card;
                }
            }
            SessionAction::Select(id) => {
                if let Some(index) = position_of(&self.deck, id) {
                    self.current_index = index;
                }
            }
        }
        self
    }

    #[must_use]
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    #[must_use]
    pub fn into_deck(self) -> Vec<Card> {
        self.deck
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn next_review_index(&self) -> usize {
        self.next_review_index
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.deck.get(self.current_index)
    }

    #[must_use]
    pub fn next_review_card(&self) -> Option<&Card> {
        self.deck.get(self.next_review_index)
    }

    /// Cards carrying `status`, in deck order.
    pub fn cards_with_status(&self, status: CardStatus) -> impl Iterator<Item = &Card> {
        self.deck.iter().filter(move |card| card.status() == status)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<CardId> {
        self.deck.iter().map(Card::id).collect()
    }
}

fn position_of(deck: &[Card], id: CardId) -> Option<usize> {
    deck.iter().position(|card| card.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u64, status: CardStatus) -> Card {
        Card::new(CardId::new(id), format!("front {id}"), format!("back {id}")).with_status(status)
    }

    fn session(statuses: &[CardStatus]) -> ReviewSession {
        let deck = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| card(i as u64 + 1, *s))
            .collect();
        ReviewSession::resume(deck, None, None)
    }

    #[test]
    fn resume_finds_stored_card() {
        let deck = vec![
            card(3, CardStatus::Unset),
            card(1, CardStatus::Unset),
            card(2, CardStatus::Unset),
        ];
        let s = ReviewSession::resume(deck, Some(CardId::new(2)), Some(CardId::new(1)));
        assert_eq!(s.current_index(), 2);
        assert_eq!(s.next_review_index(), 1);
    }

    #[test]
    fn resume_falls_back_to_first_visible() {
        let deck = vec![card(1, CardStatus::DontShow), card(2, CardStatus::Known)];
        let s = ReviewSession::resume(deck, Some(CardId::new(99)), Some(CardId::new(98)));
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.next_review_index(), 0);
    }

    #[test]
    fn resume_skips_hidden_resume_card() {
        let deck = vec![
            card(1, CardStatus::Unset),
            card(2, CardStatus::DontShow),
            card(3, CardStatus::Unset),
        ];
        let s = ReviewSession::resume(deck, Some(CardId::new(2)), Some(CardId::new(2)));
        assert_eq!(s.current_card().map(Card::id), Some(CardId::new(3)));
        // The review pointer is not moved past hidden cards.
        assert_eq!(s.next_review_card().map(Card::id), Some(CardId::new(2)));
    }

    #[test]
    fn next_and_previous_wrap_around_hidden() {
        let s = session(&[
            CardStatus::Unset,
            CardStatus::DontShow,
            CardStatus::Known,
        ]);
        let s = s.apply(SessionAction::GoNext);
        assert_eq!(s.current_index(), 2);
        let s = s.apply(SessionAction::GoNext);
        assert_eq!(s.current_index(), 0);
        let s = s.apply(SessionAction::GoPrevious);
        assert_eq!(s.current_index(), 2);
        let s = s.apply(SessionAction::GoPrevious);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn update_replaces_by_id_and_ignores_strangers() {
        let s = session(&[CardStatus::Unset, CardStatus::Unset]);
        let updated = s.deck()[1].clone().with_status(CardStatus::ReviewSoon);
        let s = s.apply(SessionAction::UpdateCard(updated));
        assert_eq!(s.deck()[1].status(), CardStatus::ReviewSoon);

        let before = s.clone();
        let s = s.apply(SessionAction::UpdateCard(card(42, CardStatus::Known)));
        assert_eq!(s, before);
    }

    #[test]
    fn select_moves_only_to_known_ids() {
        let s = session(&[CardStatus::Unset, CardStatus::Unset, CardStatus::Unset]);
        let s = s.apply(SessionAction::Select(CardId::new(3)));
        assert_eq!(s.current_index(), 2);
        let s = s.apply(SessionAction::Select(CardId::new(77)));
        assert_eq!(s.current_index(), 2);
    }

    #[test]
    fn empty_session_ignores_actions() {
        let s = ReviewSession::resume(Vec::new(), Some(CardId::new(1)), None);
        assert!(s.is_empty());
        assert!(s.current_card().is_none());
        let s = s.apply(SessionAction::GoNext).apply(SessionAction::GoPrevious);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn cards_with_status_keeps_deck_order() {
        let s = session(&[
            CardStatus::Known,
            CardStatus::Unknown,
            CardStatus::Known,
        ]);
        let known: Vec<CardId> = s.cards_with_status(CardStatus::Known).map(Card::id).collect();
        assert_eq!(known, vec![CardId::new(1), CardId::new(3)]);
    }

    #[test]
    fn session_serializes_for_handoff() {
        let s = session(&[CardStatus::Unset]);
        let json = serde_json::to_string(&s).unwrap();
        let back: ReviewSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
