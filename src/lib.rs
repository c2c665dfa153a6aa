//! Spaced-repetition scheduling for learned items (SM-2), persisted as a
//! single JSON mapping in a key-value store.

pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use config::SrsConfig;
pub use database::{CardRepository, CardService, KeyValueStore, MemoryStore, SqliteStore};
pub use error::{PersistenceError, Result, SrsError};
pub use models::{CardMap, Quality, ReviewRecord, ReviewSession};
