//! Error types for the scheduler and its persistence layer.
use thiserror::Error;

/// Failures of the key-value store or of the mapping's (de)serialization.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the store's lock.
    #[error("store lock poisoned")]
    Poisoned,

    /// The store refused the operation (used by the in-memory store's failure mode).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SrsError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),

    #[error("quality must be a number from 0 to 5, got '{0}'")]
    UnparsableQuality(String),

    #[error("card not found: {0}")]
    CardNotFound(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SrsError>;
