//! Serialization of the current deck for sharing.

use flashdeck_core::model::{Card, SeedCard};

use crate::error::DeckError;

/// Pretty JSON of `cards` in the given order, in the seed `{id, front, back}` shape.
///
/// # Errors
///
/// Returns `DeckError::Export` if serialization fails.
pub fn export_cards(cards: &[Card]) -> Result<String, DeckError> {
    let records: Vec<SeedCard> = cards.iter().map(SeedCard::from).collect();
    serde_json::to_string_pretty(&records).map_err(DeckError::Export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{JsonSeed, SeedProvider};
    use flashdeck_core::model::{CardId, CardStatus};

    #[test]
    fn export_strips_bookkeeping_and_keeps_order() {
        let cards = vec![
            Card::new(CardId::new(2), "b", "B").with_status(CardStatus::Known),
            Card::new(CardId::new(1), "a", "A").edit("a", "A!"),
        ];
        let json = export_cards(&cards).unwrap();
        assert!(!json.contains("status"));
        assert!(!json.contains("isEdited"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"id": 2, "front": "b", "back": "B"},
                {"id": 1, "front": "a", "back": "A!"}
            ])
        );
    }

    #[test]
    fn export_reads_back_as_a_seed() {
        let cards = vec![Card::new(CardId::new(5), "x", "y\r\nz")];
        let json = export_cards(&cards).unwrap();
        let seeds = JsonSeed::from_json(json).load().unwrap();
        assert_eq!(seeds[0].clone().into_card(), cards[0]);
    }
}
