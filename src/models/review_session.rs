//! Review session over the cards that are currently due.
//! Handles multi-round review with SM-2 scheduling and persistence after every answer.

use super::{Quality, ReviewRecord};
use crate::database::{CardService, KeyValueStore};
use crate::error::Result;
use tracing::debug;

pub const DEFAULT_SESSION_LIMIT: usize = 30;

/// Outcome counters for a finished (or abandoned) session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub passed: usize,
    pub failed: usize,
    pub rounds: usize,
}

/// Cards answered with a failing grade are due again immediately, so they
/// come back in a retry round once the current round is exhausted.
pub struct ReviewSession<'a, S> {
    service: &'a CardService<S>,
    cards: Vec<ReviewRecord>,
    current_round: Vec<usize>,
    failed_this_round: Vec<usize>,
    current_index: usize,
    round_number: usize,
    summary: SessionSummary,
}

impl<'a, S: KeyValueStore> ReviewSession<'a, S> {
    /// Builds the queue from the `limit` most overdue cards.
    pub async fn start(service: &'a CardService<S>, limit: usize) -> Result<Self> {
        let cards = service.due(limit).await?;
        Ok(Self::from_cards(service, cards))
    }

    /// Makes sure `id` exists (new cards are due immediately) before building the queue.
    pub async fn start_with(
        service: &'a CardService<S>,
        id: &str,
        content_ref: &str,
        limit: usize,
    ) -> Result<Self> {
        service.ensure_item(id, content_ref).await?;
        Self::start(service, limit).await
    }

    fn from_cards(service: &'a CardService<S>, cards: Vec<ReviewRecord>) -> Self {
        let indices = (0..cards.len()).collect();
        Self {
            service,
            cards,
            current_round: indices,
            failed_this_round: Vec::new(),
            current_index: 0,
            round_number: 1,
            summary: SessionSummary::default(),
        }
    }

    pub fn current(&self) -> Option<&ReviewRecord> {
        self.current_round
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
    }

    /// Grades the current card, persists it, and moves to the next one.
    pub async fn answer(&mut self, quality: Quality) -> Result<Option<ReviewRecord>> {
        let Some(&idx) = self.current_round.get(self.current_index) else {
            return Ok(None);
        };
        let id = self.cards[idx].id.clone();
        let updated = self.service.review_existing(&id, quality).await?;
        self.cards[idx] = updated.clone();

        self.summary.answered += 1;
        if quality.is_pass() {
            self.summary.passed += 1;
        } else {
            self.summary.failed += 1;
            self.failed_this_round.push(idx);
        }

        self.current_index += 1;
        if self.current_index >= self.current_round.len() {
            self.start_next_round();
        }
        Ok(Some(updated))
    }

    fn start_next_round(&mut self) {
        if self.failed_this_round.is_empty() {
            self.current_round.clear();
            self.current_index = 0;
            return;
        }
        self.current_round = std::mem::take(&mut self.failed_this_round);
        self.current_index = 0;
        self.round_number += 1;
        debug!(
            round = self.round_number,
            cards = self.current_round.len(),
            "starting retry round"
        );
    }

    /// Cards left in the current round, the current one included.
    pub fn remaining(&self) -> usize {
        self.current_round.len().saturating_sub(self.current_index)
    }

    pub fn round(&self) -> usize {
        self.round_number
    }

    pub fn is_completed(&self) -> bool {
        self.current().is_none()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            rounds: self.round_number,
            ..self.summary
        }
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards left", self.round_number, self.remaining())
        } else {
            format!(
                "Round {} (retry): {} cards left",
                self.round_number,
                self.remaining()
            )
        }
    }
}
