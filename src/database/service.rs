//! Review pipeline: fetch-or-create, schedule, persist.
//!
//! Every read-modify-write of the mapping goes through one async mutex, so
//! reviews submitted concurrently through the same service are applied one
//! after the other instead of overwriting each other's saves.

use super::{CardRepository, KeyValueStore, repository::ensure_card};
use crate::error::{Result, SrsError};
use crate::models::{CardMap, Clock, Quality, ReviewRecord, sm2};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Snapshot counters over the whole mapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total: usize,
    pub due_now: usize,
    /// Cards never answered correctly since their last lapse.
    pub learning: usize,
    pub total_lapses: u64,
    pub mean_easiness: f64,
}

pub struct CardService<S> {
    repo: CardRepository<S>,
    clock: Arc<dyn Clock>,
    writer: Mutex<()>,
}

impl<S: KeyValueStore> CardService<S> {
    pub fn new(repo: CardRepository<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            writer: Mutex::new(()),
        }
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn repository(&self) -> &CardRepository<S> {
        &self.repo
    }

    pub async fn snapshot(&self) -> Result<CardMap> {
        Ok(self.repo.try_load_all().await?)
    }

    /// Get-or-create `id`, persisting only when a record was created.
    pub async fn ensure_item(&self, id: &str, content_ref: &str) -> Result<ReviewRecord> {
        let _guard = self.writer.lock().await;
        let mut cards = self.repo.try_load_all().await?;
        let created = !cards.contains_key(id);
        let card = ensure_card(&mut cards, id, content_ref, self.now()).clone();
        if created {
            self.repo.try_save_all(&cards).await?;
            info!(card_id = %id, content_ref, "card created");
        }
        Ok(card)
    }

    /// Grades `id`, creating its record first if this is the first encounter.
    pub async fn review_item(
        &self,
        id: &str,
        content_ref: &str,
        quality: Quality,
    ) -> Result<ReviewRecord> {
        let _guard = self.writer.lock().await;
        let mut cards = self.repo.try_load_all().await?;
        let now = self.now();
        ensure_card(&mut cards, id, content_ref, now);
        self.apply(&mut cards, id, quality, now).await
    }

    /// Grades a record that must already exist.
    pub async fn review_existing(&self, id: &str, quality: Quality) -> Result<ReviewRecord> {
        let _guard = self.writer.lock().await;
        let mut cards = self.repo.try_load_all().await?;
        if !cards.contains_key(id) {
            return Err(SrsError::CardNotFound(id.to_string()));
        }
        let now = self.now();
        self.apply(&mut cards, id, quality, now).await
    }

    async fn apply(
        &self,
        cards: &mut CardMap,
        id: &str,
        quality: Quality,
        now: i64,
    ) -> Result<ReviewRecord> {
        let current = cards
            .get(id)
            .ok_or_else(|| SrsError::CardNotFound(id.to_string()))?;
        let updated = sm2::review(current, quality, now);
        cards.insert(id.to_string(), updated.clone());
        self.repo.try_save_all(cards).await?;

        info!(
            card_id = %id,
            quality = quality.value(),
            interval = updated.interval,
            easiness = updated.easiness,
            lapses = updated.lapses,
            "card reviewed"
        );
        Ok(updated)
    }

    pub async fn due(&self, limit: usize) -> Result<Vec<ReviewRecord>> {
        let cards = self.repo.try_load_all().await?;
        Ok(sm2::due_cards(&cards, self.now(), limit))
    }

    pub async fn stats(&self) -> Result<ReviewStats> {
        let cards = self.repo.try_load_all().await?;
        Ok(compute_stats(&cards, self.now()))
    }

    /// Writes `incoming` into the store. With `merge`, records not present in
    /// `incoming` are kept; otherwise the stored mapping is replaced.
    /// Returns the number of records stored afterwards.
    pub async fn import(&self, incoming: CardMap, merge: bool) -> Result<usize> {
        let _guard = self.writer.lock().await;
        let mut cards = if merge {
            self.repo.try_load_all().await?
        } else {
            CardMap::new()
        };
        let imported = incoming.len();
        cards.extend(incoming);
        self.repo.try_save_all(&cards).await?;
        info!(imported, total = cards.len(), merge, "review mapping imported");
        Ok(cards.len())
    }
}

pub fn compute_stats(cards: &CardMap, now_ms: i64) -> ReviewStats {
    if cards.is_empty() {
        return ReviewStats::default();
    }
    ReviewStats {
        total: cards.len(),
        due_now: cards.values().filter(|c| c.is_due(now_ms)).count(),
        learning: cards.values().filter(|c| c.repetitions == 0).count(),
        total_lapses: cards.values().map(|c| c.lapses as u64).sum(),
        mean_easiness: cards.values().map(|c| c.easiness).sum::<f64>() / cards.len() as f64,
    }
}
