//! Providers for the authoritative card dataset.

use std::collections::HashSet;
use std::path::PathBuf;

use flashdeck_core::model::SeedCard;

use crate::error::SeedError;

const BUNDLED_SEED: &str = include_str!("../seed/flashcards.json");

/// Source of the read-only seed cards, loaded on cold start, reset and merge.
pub trait SeedProvider: Send + Sync {
    /// Load the full dataset in its authored order.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the dataset cannot be read or is malformed.
    fn load(&self) -> Result<Vec<SeedCard>, SeedError>;
}

#[derive(Debug, Clone)]
enum Source {
    Bundled,
    File(PathBuf),
    Inline(String),
}

/// A JSON array of `{id, front, back}` records.
#[derive(Debug, Clone)]
pub struct JsonSeed {
    source: Source,
}

impl JsonSeed {
    /// The dataset compiled into the binary.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            source: Source::Bundled,
        }
    }

    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    #[must_use]
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            source: Source::Inline(json.into()),
        }
    }
}

impl SeedProvider for JsonSeed {
    fn load(&self) -> Result<Vec<SeedCard>, SeedError> {
        let cards: Vec<SeedCard> = match &self.source {
            Source::Bundled => serde_json::from_str(BUNDLED_SEED)?,
            Source::Inline(json) => serde_json::from_str(json)?,
            Source::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&text)?
            }
        };
        check_unique(&cards)?;
        Ok(cards)
    }
}

/// A fixed list, mostly useful in tests and embedding.
impl SeedProvider for Vec<SeedCard> {
    fn load(&self) -> Result<Vec<SeedCard>, SeedError> {
        check_unique(self)?;
        Ok(self.clone())
    }
}

fn check_unique(cards: &[SeedCard]) -> Result<(), SeedError> {
    let mut seen = HashSet::with_capacity(cards.len());
    for card in cards {
        if !seen.insert(card.id) {
            return Err(SeedError::DuplicateId(card.id));
        }
    }
    Ok(())
}
