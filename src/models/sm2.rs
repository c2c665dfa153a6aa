//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates optimal review intervals based on recall quality:
//! - Each card has an easiness factor (EF) that adjusts based on performance
//! - Quality grades 0-2: streak and interval reset, the lapse counter grows
//! - Quality grades 3-5: Increase interval progressively (1 day → 6 days → EF multiplier)
//! - EF is adjusted after every review, pass or fail, and has a minimum value of 1.3
//!
//! Everything here is pure: the current time is passed in as epoch milliseconds.

use super::{CardMap, Quality, ReviewRecord};

pub const MIN_EASINESS: f64 = 1.3;
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
pub const DEFAULT_DUE_LIMIT: usize = 20;

/// New easiness factor after a review graded `quality`, floored at 1.3.
pub fn next_easiness(easiness: f64, quality: Quality) -> f64 {
    let miss = 5.0 - quality.value() as f64;
    let ef = easiness + (0.1 - miss * (0.08 + miss * 0.02));
    ef.max(MIN_EASINESS)
}

/// Calculates the record's next scheduling state.
pub fn review(record: &ReviewRecord, quality: Quality, now_ms: i64) -> ReviewRecord {
    let new_ef = next_easiness(record.easiness, quality);

    let (interval, repetitions, lapses) = if !quality.is_pass() {
        // Start from the beginning; easiness is kept
        (0, 0, record.lapses.saturating_add(1))
    } else {
        let reps = record.repetitions.saturating_add(1);
        let interval = match reps {
            1 => 1,
            2 => 6,
            _ => {
                let scaled = (record.interval as f64 * new_ef).round();
                scaled.min(u32::MAX as f64) as u32
            }
        };
        (interval, reps, record.lapses)
    };

    let due = if interval == 0 {
        now_ms
    } else {
        now_ms.saturating_add((interval as i64).saturating_mul(MS_PER_DAY))
    };

    ReviewRecord {
        id: record.id.clone(),
        content_ref: record.content_ref.clone(),
        due,
        interval,
        easiness: new_ef,
        repetitions,
        lapses,
    }
}

/// Records due at `now_ms`, most overdue first, at most `limit` of them.
/// Equal due times are ordered by id.
pub fn due_cards(cards: &CardMap, now_ms: i64, limit: usize) -> Vec<ReviewRecord> {
    let mut due: Vec<&ReviewRecord> = cards.values().filter(|c| c.is_due(now_ms)).collect();
    due.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.id.cmp(&b.id)));
    due.into_iter().take(limit).cloned().collect()
}
