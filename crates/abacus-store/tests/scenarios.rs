//! Behavioural scenarios for the result store.

use abacus_store::{JsonStore, MemoryStore, Pagination, Record, ResultSink, ResultSource};
use chrono::Utc;

#[test]
fn test_three_records_page_size_two() {
    let store = MemoryStore::new();
    for (value, expression) in [
        (3.8, "1.50 + 2.30 = 3.80"),
        (2.5, "5.00 / 2.00 = 2.50"),
        (12.0, "3.00 * 4.00 = 12.00"),
    ] {
        store.insert(Record::new(value, expression, Utc::now()));
    }

    let page = store.query(Pagination::new(1, 2));
    let expressions: Vec<&str> = page.items.iter().map(Record::expression).collect();

    assert_eq!(expressions, vec!["3.00 * 4.00 = 12.00", "5.00 / 2.00 = 2.50"]);
    assert_eq!(page.metadata.total_records, 3);
    assert_eq!(page.metadata.last_page, 2);
    assert_eq!(page.metadata.next_page, 2);
}

#[test]
fn test_empty_store_default_pagination() {
    let store = MemoryStore::new();
    let page = store.query(Pagination::default());

    assert!(page.items.is_empty());
    assert_eq!(page.metadata.total_records, 0);
    assert_eq!(page.metadata.last_page, 1);
    assert_eq!(page.metadata.next_page, 1);
}

#[test]
fn test_round_trip_preserves_value_expression_and_timestamp() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("results.json");

    let original = JsonStore::new(&path);
    for i in 0..25 {
        let value = f64::from(i) / 7.0;
        original.insert(Record::new(value, format!("{i}.0000 / 7.0000"), Utc::now()));
    }
    original.save().unwrap();

    let restored = JsonStore::open(&path).unwrap();
    let before = original.memory().snapshot();
    let after = restored.memory().snapshot();

    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.value().to_bits(), b.value().to_bits());
        assert_eq!(a.expression(), b.expression());
        assert_eq!(a.created_at(), b.created_at());
    }
}
