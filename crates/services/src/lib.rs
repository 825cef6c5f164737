#![forbid(unsafe_code)]

pub mod deck_service;
pub mod error;
pub mod export;
pub mod seed;

pub use deck_service::DeckService;
pub use error::{DeckError, SeedError};
pub use export::export_cards;
pub use seed::{JsonSeed, SeedProvider};
