pub mod db;
pub mod memory;
pub mod repository;
pub mod service;
pub mod store;

pub use db::SqliteStore;
pub use memory::MemoryStore;
pub use repository::{CardRepository, DEFAULT_STORAGE_KEY, ensure_card};
pub use service::{CardService, ReviewStats};
pub use store::KeyValueStore;
