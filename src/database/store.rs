//! Key-value contract the card repository persists through.
use crate::error::PersistenceError;
use async_trait::async_trait;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Overwrites any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

#[async_trait]
impl<'s, T: KeyValueStore + ?Sized> KeyValueStore for &'s T {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value).await
    }
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value).await
    }
}
