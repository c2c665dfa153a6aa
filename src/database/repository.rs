//! Card repository: loads and saves the whole review mapping under one key.
//!
//! `try_load_all`/`try_save_all` report failures. `load_all`/`save_all` keep
//! the fail-open behavior the review screens rely on (empty mapping on a bad
//! read, ignored write errors), but log what went wrong.

use super::KeyValueStore;
use crate::error::PersistenceError;
use crate::models::{CardMap, ReviewRecord};
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_KEY: &str = "n1_srs_cards_v1";

pub struct CardRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CardRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the mapping. A never-written or blank key is an empty mapping.
    pub async fn try_load_all(&self) -> Result<CardMap, PersistenceError> {
        match self.store.get(&self.key).await? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(CardMap::new()),
        }
    }

    pub async fn try_save_all(&self, cards: &CardMap) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(cards)?;
        self.store.set(&self.key, &raw).await?;
        debug!(key = %self.key, cards = cards.len(), "saved review mapping");
        Ok(())
    }

    /// Never fails: an unreadable or corrupt store yields an empty mapping.
    pub async fn load_all(&self) -> CardMap {
        match self.try_load_all().await {
            Ok(cards) => cards,
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not load review mapping, starting empty");
                CardMap::new()
            }
        }
    }

    /// Never fails: a store error is logged and dropped.
    pub async fn save_all(&self, cards: &CardMap) {
        if let Err(e) = self.try_save_all(cards).await {
            warn!(key = %self.key, error = %e, "could not save review mapping");
        }
    }
}

/// Returns the record for `id`, inserting a fresh one due at `now_ms` if missing.
/// An existing record is returned unchanged.
pub fn ensure_card<'a>(
    cards: &'a mut CardMap,
    id: &str,
    content_ref: &str,
    now_ms: i64,
) -> &'a mut ReviewRecord {
    cards
        .entry(id.to_string())
        .or_insert_with(|| ReviewRecord::new(id, content_ref, now_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::{Quality, sm2};

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_ensure_card_is_idempotent() {
        let mut cards = CardMap::new();
        ensure_card(&mut cards, "n1_1_4e00", "4e00", NOW).repetitions = 2;

        let again = ensure_card(&mut cards, "n1_1_4e00", "ffff", NOW + 5);
        assert_eq!(again.repetitions, 2);
        assert_eq!(again.content_ref, "4e00");
        assert_eq!(again.due, NOW);
        assert_eq!(cards.len(), 1);
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let repo = CardRepository::with_default_key(MemoryStore::new());
        assert!(repo.load_all().await.is_empty());
        assert!(repo.try_load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let repo = CardRepository::with_default_key(MemoryStore::new());
        let mut cards = CardMap::new();
        let card = ensure_card(&mut cards, "a", "61", NOW).clone();
        cards.insert("a".to_string(), sm2::review(&card, Quality::Good, NOW));
        ensure_card(&mut cards, "b", "62", NOW);

        repo.try_save_all(&cards).await.unwrap();
        assert_eq!(repo.load_all().await, cards);
    }

    #[tokio::test]
    async fn test_corrupt_value_fails_open() {
        let store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, "{ not json").await.unwrap();
        let repo = CardRepository::with_default_key(store);

        assert!(matches!(
            repo.try_load_all().await,
            Err(PersistenceError::Serialization(_))
        ));
        assert!(repo.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_store_fails_open() {
        let store = MemoryStore::new();
        store.set_failing(true);
        let repo = CardRepository::with_default_key(store);
        assert!(repo.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let store = MemoryStore::new();
        store.set_failing(true);
        let repo = CardRepository::with_default_key(store);
        let mut cards = CardMap::new();
        ensure_card(&mut cards, "a", "61", NOW);

        repo.save_all(&cards).await;
        assert!(repo.try_save_all(&cards).await.is_err());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryStore::new();
        let mut cards = CardMap::new();
        ensure_card(&mut cards, "a", "61", NOW);
        CardRepository::new(&store, "profile_a")
            .try_save_all(&cards)
            .await
            .unwrap();

        assert!(CardRepository::new(&store, "profile_b").load_all().await.is_empty());
        assert_eq!(CardRepository::new(&store, "profile_a").load_all().await.len(), 1);
    }
}
