use chrono::{Days, NaiveDate};
use subtrack_core::{
    KeyValueStore, LoadOutcome, MemoryKeyValueStore, PersistError, SqliteKeyValueStore,
    Subscription, SubscriptionPersistence, SubscriptionValidationError, SUBSCRIPTIONS_KEY,
};

fn sample_records(count: usize) -> Vec<Subscription> {
    let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    (0..count)
        .map(|n| {
            Subscription::new(
                format!("Service #{n} \u{2603}"),
                n as f64 * 1.37 + 0.01,
                base.checked_add_days(Days::new(n as u64 * 11)).unwrap(),
            )
        })
        .collect()
}

#[test]
fn save_then_load_reproduces_collection() {
    for count in [0, 1, 50] {
        let records = sample_records(count);
        let mut persistence = SubscriptionPersistence::new(MemoryKeyValueStore::new());

        persistence.save(&records).unwrap();

        assert_eq!(
            persistence.load(),
            LoadOutcome::Loaded(records),
            "round trip failed for {count} records"
        );
    }
}

#[test]
fn save_then_load_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtrack.sqlite3");
    let records = sample_records(50);

    let mut persistence = SubscriptionPersistence::new(SqliteKeyValueStore::open(&path).unwrap());
    persistence.save(&records).unwrap();
    drop(persistence);

    let reopened = SubscriptionPersistence::new(SqliteKeyValueStore::open(&path).unwrap());
    assert_eq!(reopened.load().into_records(), records);
}

#[test]
fn load_is_idempotent() {
    let mut persistence = SubscriptionPersistence::new(MemoryKeyValueStore::new());
    persistence.save(&sample_records(3)).unwrap();

    let first = persistence.load();
    let second = persistence.load();
    assert_eq!(first, second);
}

#[test]
fn save_replaces_previous_blob() {
    let mut persistence = SubscriptionPersistence::new(MemoryKeyValueStore::new());
    persistence.save(&sample_records(5)).unwrap();
    persistence.save(&sample_records(2)[..1]).unwrap();

    assert_eq!(persistence.load().into_records().len(), 1);
    assert_eq!(persistence.store().len(), 1);
}

#[test]
fn load_from_empty_store_is_missing() {
    let persistence = SubscriptionPersistence::new(MemoryKeyValueStore::new());

    let outcome = persistence.load();
    assert_eq!(outcome, LoadOutcome::Missing);
    assert!(outcome.into_records().is_empty());
}

#[test]
fn load_from_corrupt_store_is_empty_not_a_crash() {
    let mut store = MemoryKeyValueStore::new();
    store.set(SUBSCRIPTIONS_KEY, b"\xff\x00 definitely not json").unwrap();
    let persistence = SubscriptionPersistence::new(store);

    let outcome = persistence.load();
    assert!(outcome.is_corrupt());
    assert!(outcome.into_records().is_empty());
}

#[test]
fn load_treats_schema_mismatch_as_corrupt() {
    let mut store = MemoryKeyValueStore::new();
    store
        .set(SUBSCRIPTIONS_KEY, br#"{"subscriptions": []}"#)
        .unwrap();
    let persistence = SubscriptionPersistence::new(store);

    assert!(persistence.load().is_corrupt());
}

#[test]
fn load_treats_invalid_record_as_corrupt() {
    let mut store = MemoryKeyValueStore::new();
    store
        .set(
            SUBSCRIPTIONS_KEY,
            br#"[{"id":"00000000-0000-0000-0000-000000000000","name":"x","amount":1.0,"renewalDate":"2026-01-01"}]"#,
        )
        .unwrap();
    let persistence = SubscriptionPersistence::new(store);

    match persistence.load() {
        LoadOutcome::Corrupt { reason } => assert!(reason.contains("nil"), "{reason}"),
        other => panic!("expected corrupt outcome, got {other:?}"),
    }
}

#[test]
fn save_rejects_unencodable_record_and_keeps_previous_blob() {
    let good = sample_records(2);
    let mut persistence = SubscriptionPersistence::new(MemoryKeyValueStore::new());
    persistence.save(&good).unwrap();

    let mut with_nan = good.clone();
    with_nan.push(Subscription::new(
        "bad",
        f64::NAN,
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
    ));

    match persistence.save(&with_nan) {
        Err(PersistError::Invalid { position, error }) => {
            assert_eq!(position, 2);
            assert_eq!(error, SubscriptionValidationError::NonFiniteAmount);
        }
        other => panic!("expected invalid record error, got {other:?}"),
    }
    assert_eq!(persistence.load(), LoadOutcome::Loaded(good));
}

#[test]
fn save_rejects_invalid_record_into_empty_store_without_writing() {
    let mut persistence = SubscriptionPersistence::new(MemoryKeyValueStore::new());
    let negative = Subscription::new(
        "refund",
        -4.0,
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
    );

    assert!(matches!(
        persistence.save(&[negative]),
        Err(PersistError::Invalid { position: 0, .. })
    ));
    assert!(persistence.store().is_empty());
    assert_eq!(persistence.load(), LoadOutcome::Missing);
}
