#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    CardRepository, InMemoryRepository, SessionStateRepository, StateKey, Storage, StorageError,
};
