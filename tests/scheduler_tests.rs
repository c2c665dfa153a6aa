use srs_app::database::{CardRepository, CardService, KeyValueStore, SqliteStore, ensure_card};
use srs_app::models::sm2::MS_PER_DAY;
use srs_app::models::{CardMap, FixedClock, Quality, ReviewRecord, sm2};
use std::sync::Arc;

const NOW: i64 = 1_700_000_000_000;

fn sqlite_service(clock: Arc<FixedClock>) -> CardService<SqliteStore> {
    let store = SqliteStore::open_in_memory().unwrap();
    CardService::new(CardRepository::with_default_key(store), clock)
}

#[tokio::test]
async fn test_learning_curve_over_several_days() {
    let clock = Arc::new(FixedClock::new(NOW));
    let service = sqlite_service(clock.clone());

    let card = service
        .review_item("n1_12_61f2", "61f2", Quality::Perfect)
        .await
        .unwrap();
    assert_eq!((card.repetitions, card.interval), (1, 1));
    assert!((card.easiness - 2.6).abs() < 1e-9);
    assert_eq!(card.due, NOW + MS_PER_DAY);

    clock.advance_days(1);
    let card = service
        .review_item("n1_12_61f2", "61f2", Quality::Perfect)
        .await
        .unwrap();
    assert_eq!((card.repetitions, card.interval), (2, 6));
    assert!((card.easiness - 2.7).abs() < 1e-9);
    assert_eq!(card.due, clock_now(&clock) + 6 * MS_PER_DAY);

    clock.advance_days(6);
    let card = service
        .review_item("n1_12_61f2", "61f2", Quality::Good)
        .await
        .unwrap();
    assert_eq!(card.repetitions, 3);
    assert_eq!(card.interval, (6.0 * card.easiness).round() as u32);
    assert_eq!(card.interval, 16);

    let easiness_before = card.easiness;
    let card = service
        .review_item("n1_12_61f2", "61f2", Quality::Incorrect)
        .await
        .unwrap();
    assert_eq!((card.repetitions, card.interval, card.lapses), (0, 0, 1));
    assert_eq!(card.due, clock_now(&clock));
    assert!(card.easiness < easiness_before);
    assert!(card.easiness >= 1.3);
}

fn clock_now(clock: &FixedClock) -> i64 {
    use srs_app::models::Clock;
    clock.now_millis()
}

#[tokio::test]
async fn test_due_queue_only_returns_overdue_cards() {
    let mut cards = CardMap::new();
    cards.insert("A".into(), ReviewRecord::new("A", "61", NOW - 1_000));
    cards.insert("B".into(), ReviewRecord::new("B", "62", NOW + 100_000));

    let due = sm2::due_cards(&cards, NOW, 10);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, "A");
}

#[tokio::test]
async fn test_corrupt_store_loads_empty() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.set("n1_srs_cards_v1", "[1, 2").await.unwrap();

    let repo = CardRepository::with_default_key(store);
    assert!(repo.load_all().await.is_empty());
    assert!(repo.try_load_all().await.is_err());
}

#[tokio::test]
async fn test_roundtrip_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("srs.db");

    let mut cards = CardMap::new();
    ensure_card(&mut cards, "a", "4e00", NOW);
    let reviewed = sm2::review(ensure_card(&mut cards, "b", "4e8c", NOW), Quality::Hard, NOW);
    cards.insert("b".into(), reviewed);

    CardRepository::with_default_key(SqliteStore::open(&path).unwrap())
        .save_all(&cards)
        .await;

    let loaded = CardRepository::with_default_key(SqliteStore::open(&path).unwrap())
        .load_all()
        .await;
    assert_eq!(loaded, cards);
}

#[tokio::test]
async fn test_stored_json_uses_wire_names() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let service = CardService::new(
        CardRepository::new(store.clone(), "profile_a"),
        Arc::new(FixedClock::new(NOW)),
    );
    service.ensure_item("n1_1_4e00", "4e00").await.unwrap();

    let raw = store.get("profile_a").await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let card = &value["n1_1_4e00"];
    assert_eq!(card["hex"], "4e00");
    assert_eq!(card["ef"], 2.5);
    assert_eq!(card["reps"], 0);
    assert_eq!(card["due"], NOW);
}
