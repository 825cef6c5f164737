use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── CARD STATUS ───────────────────────────────────────────────────────────────
//

/// Manual recall tag set by the learner.
///
/// `Unset` is the absence of a tag; it persists as `null` rather than a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardStatus {
    Known,
    Unknown,
    ReviewSoon,
    DontShow,
    #[default]
    Unset,
}

impl CardStatus {
    /// Every status in menu order, `Unset` last.
    pub const ALL: [CardStatus; 5] = [
        CardStatus::Known,
        CardStatus::Unknown,
        CardStatus::ReviewSoon,
        CardStatus::DontShow,
        CardStatus::Unset,
    ];

    /// Persisted representation; `None` for `Unset`.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            CardStatus::Known => Some("known"),
            CardStatus::Unknown => Some("unknown"),
            CardStatus::ReviewSoon => Some("reviewSoon"),
            CardStatus::DontShow => Some("dontShow"),
            CardStatus::Unset => None,
        }
    }

    /// Parse the persisted representation produced by [`CardStatus::as_str`].
    ///
    /// # Errors
    ///
    /// Returns `CardStatusError` for strings that are not a known tag.
    pub fn from_persisted(raw: Option<&str>) -> Result<Self, CardStatusError> {
        match raw {
            None => Ok(CardStatus::Unset),
            Some("known") => Ok(CardStatus::Known),
            Some("unknown") => Ok(CardStatus::Unknown),
            Some("reviewSoon") => Ok(CardStatus::ReviewSoon),
            Some("dontShow") => Ok(CardStatus::DontShow),
            Some(other) => Err(CardStatusError {
                raw: other.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CardStatus::Known => "Known",
            CardStatus::Unknown => "Unknown",
            CardStatus::ReviewSoon => "Review soon",
            CardStatus::DontShow => "Don't show",
            CardStatus::Unset => "None",
        }
    }

    /// Hidden cards are skipped by navigation.
    #[must_use]
    pub fn is_hidden(self) -> bool {
        matches!(self, CardStatus::DontShow)
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts both the persisted spelling and a kebab-case spelling
/// (`review-soon`, `dont-show`), plus `none` for `Unset`.
impl FromStr for CardStatus {
    type Err = CardStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "unset" => Ok(CardStatus::Unset),
            "review-soon" => Ok(CardStatus::ReviewSoon),
            "dont-show" => Ok(CardStatus::DontShow),
            other => CardStatus::from_persisted(Some(other)),
        }
    }
}

impl Serialize for CardStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CardStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        CardStatus::from_persisted(raw.as_deref()).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown card status: {raw:?}")]
pub struct CardStatusError {
    raw: String,
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A front/back flashcard together with the learner's review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    id: CardId,
    front: String,
    back: String,
    #[serde(default)]
    status: CardStatus,
    #[serde(default)]
    is_edited: bool,
}

impl Card {
    /// Fresh card with no status and unedited text.
    #[must_use]
    pub fn new(id: CardId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            status: CardStatus::Unset,
            is_edited: false,
        }
    }

    /// Rehydrate a card from storage.
    #[must_use]
    pub fn from_persisted(
        id: CardId,
        front: String,
        back: String,
        status: CardStatus,
        is_edited: bool,
    ) -> Self {
        Self {
            id,
            front,
            back,
            status,
            is_edited,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }

    #[must_use]
    pub fn status(&self) -> CardStatus {
        self.status
    }

    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.is_edited
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.status.is_hidden()
    }

    /// The back text split into display lines, accepting `\r\n` and `\n` breaks.
    #[must_use]
    pub fn back_lines(&self) -> Vec<&str> {
        self.back.lines().collect()
    }

    #[must_use]
    pub fn with_status(mut self, status: CardStatus) -> Self {
        self.status = status;
        self
    }

    /// Overwrite the text. The card is flagged as edited only when something changed.
    #[must_use]
    pub fn edit(mut self, front: impl Into<String>, back: impl Into<String>) -> Self {
        let front = front.into();
        let back = back.into();
        if front != self.front || back != self.back {
            self.front = front;
            self.back = back;
            self.is_edited = true;
        }
        self
    }
}
