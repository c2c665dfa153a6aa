//! Scheduling state of one learned item.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_EASINESS: f64 = 2.5;

/// All review records keyed by item id, persisted as one unit.
pub type CardMap = BTreeMap<String, ReviewRecord>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: String,
    /// Opaque content reference, e.g. the kanji's code point in hex.
    #[serde(rename = "hex")]
    pub content_ref: String,
    /// Epoch milliseconds.
    pub due: i64,
    /// Days until the next review.
    pub interval: u32,
    #[serde(rename = "ef")]
    pub easiness: f64,
    #[serde(rename = "reps")]
    pub repetitions: u32,
    pub lapses: u32,
}

impl ReviewRecord {
    pub fn new(id: impl Into<String>, content_ref: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            content_ref: content_ref.into(),
            due: now_ms,
            interval: 0,
            easiness: DEFAULT_EASINESS,
            repetitions: 0,
            lapses: 0,
        }
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        self.due <= now_ms
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let card = ReviewRecord::new("n1_12_61f2", "61f2", 1_000);
        assert_eq!(card.due, 1_000);
        assert_eq!(card.interval, 0);
        assert_eq!(card.easiness, 2.5);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.lapses, 0);
        assert!(card.is_due(1_000));
        assert!(!card.is_due(999));
    }

    #[test]
    fn test_wire_field_names() {
        let card = ReviewRecord::new("n1_12_61f2", "61f2", 1_000);
        let value = serde_json::to_value(&card).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["due", "ef", "hex", "id", "interval", "lapses", "reps"]
        );
        assert_eq!(obj["hex"], "61f2");
    }

    #[test]
    fn test_parses_stored_mapping() {
        let json = r#"{"n1_1_4e00":{"id":"n1_1_4e00","hex":"4e00","due":1700000000000,
            "interval":6,"ef":2.7,"reps":2,"lapses":1}}"#;
        let map: CardMap = serde_json::from_str(json).unwrap();
        let card = &map["n1_1_4e00"];
        assert_eq!(card.content_ref, "4e00");
        assert_eq!(card.interval, 6);
        assert_eq!(card.repetitions, 2);
        assert_eq!(card.lapses, 1);
        assert!(card.due_at().is_some());
    }
}
