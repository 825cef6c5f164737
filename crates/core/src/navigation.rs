//! Circular navigation over a deck that skips hidden cards.
//!
//! Scans are bounded to the deck length, so a deck where every card is hidden
//! resolves to the start position instead of spinning. An empty deck yields `None`.

use crate::model::Card;

/// Index of the first visible card at or after `start`, wrapping forward.
#[must_use]
pub fn next_visible_index(cards: &[Card], start: usize) -> Option<usize> {
    let len = cards.len();
    if len == 0 {
        return None;
    }

    let start = start % len;
    let found = (0..len)
        .map(|step| (start + step) % len)
        .find(|&i| !cards[i].is_hidden());
    Some(found.unwrap_or(start))
}

/// Index of the first visible card at or before `start`, wrapping backward.
///
/// A negative `start` means "before the first card" and is normalised to the last index.
#[must_use]
pub fn previous_visible_index(cards: &[Card], start: isize) -> Option<usize> {
    let len = cards.len();
    if len == 0 {
        return None;
    }

    let start = usize::try_from(start).map_or(len - 1, |s| s % len);
    let found = (0..len)
        .map(|step| (start + len - step) % len)
        .find(|&i| !cards[i].is_hidden());
    Some(found.unwrap_or(start))
}

#[must_use]
pub fn next_visible(cards: &[Card], start: usize) -> Option<&Card> {
    next_visible_index(cards, start).map(|i| &cards[i])
}

#[must_use]
pub fn previous_visible(cards: &[Card], start: isize) -> Option<&Card> {
    previous_visible_index(cards, start).map(|i| &cards[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardId, CardStatus};
    use proptest::prelude::*;

    fn deck(hidden: &[bool]) -> Vec<Card> {
        hidden
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let card = Card::new(CardId::new(i as u64), format!("f{i}"), format!("b{i}"));
                if h {
                    card.with_status(CardStatus::DontShow)
                } else {
                    card
                }
            })
            .collect()
    }

    #[test]
    fn empty_deck_has_no_position() {
        assert_eq!(next_visible_index(&[], 0), None);
        assert_eq!(previous_visible_index(&[], -1), None);
    }

    #[test]
    fn single_card_is_always_returned() {
        let cards = deck(&[true]);
        assert_eq!(next_visible_index(&cards, 0), Some(0));
        assert_eq!(next_visible_index(&cards, 5), Some(0));
        assert_eq!(previous_visible_index(&cards, -1), Some(0));
    }

    #[test]
    fn next_skips_hidden_and_wraps() {
        let cards = deck(&[false, true, true, false]);
        assert_eq!(next_visible_index(&cards, 1), Some(3));
        assert_eq!(next_visible_index(&cards, 4), Some(0));
        assert_eq!(next_visible(&cards, 2).map(Card::id), Some(CardId::new(3)));
    }

    #[test]
    fn previous_skips_hidden_and_wraps() {
        let cards = deck(&[false, true, false, true]);
        assert_eq!(previous_visible_index(&cards, 1), Some(0));
        assert_eq!(previous_visible_index(&cards, -1), Some(2));
        assert_eq!(previous_visible_index(&cards, 0), Some(0));
        assert_eq!(
            previous_visible(&cards, 3).map(Card::id),
            Some(CardId::new(2))
        );
    }

    #[test]
    fn all_hidden_returns_start() {
        let cards = deck(&[true, true, true]);
        assert_eq!(next_visible_index(&cards, 1), Some(1));
        assert_eq!(previous_visible_index(&cards, 2), Some(2));
        assert_eq!(previous_visible_index(&cards, -1), Some(2));
    }

    proptest! {
        #[test]
        fn stepping_next_cycles_through_visible_cards(
            hidden in proptest::collection::vec(any::<bool>(), 1..24),
            start in 0usize..24,
        ) {
            prop_assume!(hidden.iter().any(|h| !h));
            let cards = deck(&hidden);
            let len = cards.len();
            let visible: Vec<usize> = (0..len).filter(|&i| !hidden[i]).collect();

            let mut index = next_visible_index(&cards, start).unwrap();
            let mut visited = Vec::new();
            for _ in 0..visible.len() {
                prop_assert!(!cards[index].is_hidden());
                visited.push(index);
                index = next_visible_index(&cards, index + 1).unwrap();
            }
            // One full lap returns to the first visible index and touches each once.
            prop_assert_eq!(index, visited[0]);
            let mut sorted = visited.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, visible);
        }

        #[test]
        fn previous_never_lands_on_hidden_when_any_visible(
            hidden in proptest::collection::vec(any::<bool>(), 1..24),
            start in -1isize..24,
        ) {
            prop_assume!(hidden.iter().any(|h| !h));
            let cards = deck(&hidden);
            let index = previous_visible_index(&cards, start).unwrap();
            prop_assert!(!cards[index].is_hidden());
        }
    }
}
