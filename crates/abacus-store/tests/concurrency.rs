//! Concurrent access tests for the result stores.

use abacus_store::{
    JsonStore, MemoryStore, Pagination, Record, ResultSink, ResultSource, ResultStore,
    MAX_PAGE_SIZE,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

const WRITERS: usize = 8;
const INSERTS_PER_WRITER: usize = 50;

fn record(writer: usize, seq: usize) -> Record {
    Record::new(seq as f64, format!("w{writer}-{seq}"), Utc::now())
}

/// Pages through the whole store and returns every expression.
fn read_all(store: &dyn ResultStore) -> Vec<String> {
    let mut out = Vec::new();
    let mut page = 1;
    loop {
        let result = store.query(Pagination::new(page, MAX_PAGE_SIZE));
        if result.items.is_empty() {
            break;
        }
        out.extend(result.items.iter().map(|r| r.expression().to_string()));
        page += 1;
    }
    out
}

#[test]
fn test_concurrent_inserts_are_neither_lost_nor_duplicated() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for seq in 0..INSERTS_PER_WRITER {
                    store.insert(record(writer, seq));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let all = read_all(store.as_ref());
    let unique: HashSet<&String> = all.iter().collect();

    assert_eq!(all.len(), WRITERS * INSERTS_PER_WRITER);
    assert_eq!(unique.len(), all.len());

    let meta = store.query(Pagination::new(1, MAX_PAGE_SIZE)).metadata;
    assert_eq!(meta.total_records, (WRITERS * INSERTS_PER_WRITER) as u64);
}

#[test]
fn test_each_writer_order_is_preserved() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for seq in 0..INSERTS_PER_WRITER {
                    store.insert(record(writer, seq));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Newest first: within one writer, sequence numbers must strictly fall.
    for writer in 0..WRITERS {
        let prefix = format!("w{writer}-");
        let seqs: Vec<usize> = read_all(store.as_ref())
            .iter()
            .filter_map(|e| e.strip_prefix(&prefix).map(|s| s.parse().unwrap()))
            .collect();
        assert_eq!(seqs.len(), INSERTS_PER_WRITER);
        assert!(seqs.windows(2).all(|w| w[0] > w[1]));
    }
}

#[test]
fn test_readers_see_consistent_pages_during_writes() {
    let store = Arc::new(MemoryStore::new());

    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for seq in 0..INSERTS_PER_WRITER {
                    store.insert(record(writer, seq));
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut last_total = 0;
                for page in 1..200 {
                    let result = store.query(Pagination::new(page % 5 + 1, 7));
                    let meta = result.metadata;

                    assert!(result.items.len() <= 7);
                    assert!(meta.total_records >= last_total);
                    assert!(meta.next_page <= meta.last_page);

                    let offset = (meta.current_page - 1) * meta.page_size;
                    let expected = meta.total_records.saturating_sub(offset).min(meta.page_size);
                    assert_eq!(result.items.len() as u64, expected);

                    last_total = meta.total_records;
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), WRITERS * INSERTS_PER_WRITER);
}

#[test]
fn test_json_store_save_during_inserts_is_a_consistent_snapshot() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("results.json");
    let store = Arc::new(JsonStore::new(&path));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for seq in 0..200 {
                store.insert(record(0, seq));
            }
        })
    };

    let saved = store.save().unwrap();
    writer.join().unwrap();

    let reloaded = JsonStore::open(&path).unwrap();
    assert_eq!(reloaded.memory().len(), saved);

    // Whatever was captured is a suffix of the final sequence.
    let final_records = store.memory().snapshot();
    let snapshot = reloaded.memory().snapshot();
    assert_eq!(&final_records[final_records.len() - saved..], &snapshot[..]);
}
