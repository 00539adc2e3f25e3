//! Dedup under concurrent writers sharing one database file.

use std::sync::{Arc, Barrier};
use std::thread;

use coherence_ir::Circuit;
use coherence_metrics::MetricsEngine;
use coherence_store::{ContentHash, MemoryStore, Provenance, ResultStore, SqliteStore};

const WRITERS: usize = 8;

#[test]
fn test_separate_handles_store_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("results.db");

    let circuit = Circuit::qft(4).unwrap();
    let metrics = MetricsEngine::default().analyze(&circuit);
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let path = path.clone();
            let circuit = circuit.clone();
            let metrics = metrics.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = SqliteStore::open(&path).unwrap();
                barrier.wait();
                store.put(&circuit, &metrics, &Provenance::new("qasm")).unwrap().id
            })
        })
        .collect();

    let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.iter().all(|&id| id == ids[0]), "ids diverged: {ids:?}");

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    let hash = ContentHash::of(&circuit).unwrap();
    assert_eq!(store.find_by_hash(&hash).unwrap().unwrap().id, ids[0]);
}

#[test]
fn test_shared_handle_store_one_row() {
    let stores: [Arc<dyn ResultStore>; 2] = [
        Arc::new(SqliteStore::in_memory().unwrap()),
        Arc::new(MemoryStore::new()),
    ];
    let circuit = Circuit::ghz(5).unwrap();
    let metrics = MetricsEngine::default().analyze(&circuit);

    for store in stores {
        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                let store = Arc::clone(&store);
                let circuit = circuit.clone();
                let metrics = metrics.clone();
                thread::spawn(move || store.put(&circuit, &metrics, &Provenance::new("qasm")).unwrap().id)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
        assert_eq!(store.count().unwrap(), 1);
    }
}

#[test]
fn test_reopen_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.db");
    let circuit = Circuit::bell().unwrap();
    let metrics = MetricsEngine::default().analyze(&circuit);

    let id = SqliteStore::open(&path)
        .unwrap()
        .put(&circuit, &metrics, &Provenance::new("qasm"))
        .unwrap()
        .id;

    let reopened = SqliteStore::open(&path).unwrap();
    let row = reopened.get(id).unwrap();
    assert_eq!(row.circuit, circuit);
    assert_eq!(row.metrics, metrics);
}
