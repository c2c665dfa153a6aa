//! SQLite-backed key-value store.
//!
//! Handles database initialization and the single `kv_store` table the
//! card repository writes its serialized mapping into.

use super::KeyValueStore;
use crate::error::PersistenceError;
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Creates the `kv_store` table if it does not exist yet.
pub fn init_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`, creating missing parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "opening SQLite store");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, PersistenceError> {
        init_database(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let conn = self.conn.lock().map_err(|_| PersistenceError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let conn = self.conn.lock().map_err(|_| PersistenceError::Poisoned)?;
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("n1_srs_cards_v1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("k", "{}").await.unwrap();
        store.set("k", r#"{"a":1}"#).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn test_file_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("srs.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("k", "v").await.unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
