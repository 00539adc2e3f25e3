//! In-memory result store (no persistence).
//!
//! Rows are lost when the process exits.

use chrono::{Duration, Utc};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use coherence_ir::Circuit;
use coherence_metrics::MetricsResult;

use crate::ResultStore;
use crate::error::{StoreError, StoreResult};
use crate::hash::ContentHash;
use crate::record::{Provenance, ResultSummary, StoreStats, StoredResult, clamp_page_size};

#[derive(Debug)]
struct Inner {
    rows: Vec<StoredResult>,
    by_hash: FxHashMap<ContentHash, usize>,
    next_id: i64,
}

/// In-memory result store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                rows: Vec::new(),
                by_hash: FxHashMap::default(),
                next_id: 1,
            })),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore for MemoryStore {
    fn put(
        &self,
        circuit: &Circuit,
        metrics: &MetricsResult,
        provenance: &Provenance,
    ) -> StoreResult<StoredResult> {
        let hash = ContentHash::of(circuit)?;
        let mut inner = self.lock()?;
        if let Some(&index) = inner.by_hash.get(&hash) {
            debug!(hash = %hash, "result already stored");
            return Ok(inner.rows[index].clone());
        }

        let stored = StoredResult {
            id: inner.next_id,
            content_hash: hash.clone(),
            circuit: circuit.clone(),
            metrics: metrics.clone(),
            source_format: provenance.source_format.clone(),
            notes: provenance.notes.clone(),
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        let index = inner.rows.len();
        inner.rows.push(stored.clone());
        inner.by_hash.insert(hash, index);
        debug!(id = stored.id, "stored new result");
        Ok(stored)
    }

    fn get(&self, id: i64) -> StoreResult<StoredResult> {
        let inner = self.lock()?;
        // Ids are dense and ascending until the next clear.
        id.checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| inner.rows.get(i))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn find_by_hash(&self, hash: &ContentHash) -> StoreResult<Option<StoredResult>> {
        let inner = self.lock()?;
        Ok(inner.by_hash.get(hash).map(|&i| inner.rows[i].clone()))
    }

    fn list(&self, page: usize, page_size: usize) -> StoreResult<Vec<ResultSummary>> {
        let page_size = clamp_page_size(page_size);
        let inner = self.lock()?;
        Ok(inner
            .rows
            .iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .map(StoredResult::summary)
            .collect())
    }

    fn clear(&self) -> StoreResult<usize> {
        let mut inner = self.lock()?;
        let removed = inner.rows.len();
        inner.rows.clear();
        inner.by_hash.clear();
        inner.next_id = 1;
        debug!(removed, "cleared store");
        Ok(removed)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let inner = self.lock()?;
        let rows = &inner.rows;
        if rows.is_empty() {
            return Ok(StoreStats::default());
        }
        let n = rows.len() as f64;
        let mean = |f: fn(&StoredResult) -> f64| rows.iter().map(f).sum::<f64>() / n;
        let cutoff = Utc::now() - Duration::hours(24);
        let mut format_distribution = BTreeMap::new();
        for row in rows {
            *format_distribution
                .entry(row.source_format.clone())
                .or_insert(0) += 1;
        }
        Ok(StoreStats {
            total_records: rows.len(),
            average_qes: Some(mean(|r| r.metrics.qes)),
            average_fidelity: Some(mean(|r| r.metrics.fidelity)),
            average_depth: Some(mean(|r| r.metrics.depth as f64)),
            max_depth: rows.iter().map(|r| r.metrics.depth).max(),
            recent_24h: rows.iter().filter(|r| r.created_at >= cutoff).count(),
            format_distribution,
        })
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coherence_ir::QubitId;
    use coherence_metrics::MetricsEngine;

    fn put_rx(store: &MemoryStore, theta: f64) -> StoredResult {
        let mut builder = Circuit::builder(1);
        builder.rx(theta, QubitId(0)).unwrap();
        let circuit = builder.build().unwrap();
        let metrics = MetricsEngine::default().analyze(&circuit);
        store.put(&circuit, &metrics, &Provenance::new("qasm")).unwrap()
    }

    #[test]
    fn test_memory_store_dedup() {
        let store = MemoryStore::new();
        let a = put_rx(&store, 0.5);
        let b = put_rx(&store, 0.5);
        assert_eq!(a, b);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.find_by_hash(&a.content_hash).unwrap(), Some(a));
    }

    #[test]
    fn test_memory_store_get_and_list() {
        let store = MemoryStore::new();
        for i in 0..3 {
            put_rx(&store, f64::from(i));
        }
        assert_eq!(store.get(2).unwrap().id, 2);
        assert_eq!(store.get(0).unwrap_err(), StoreError::NotFound(0));
        assert_eq!(store.get(-1).unwrap_err(), StoreError::NotFound(-1));
        assert_eq!(store.get(4).unwrap_err(), StoreError::NotFound(4));

        let page = store.list(1, 2).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 3);
    }

    #[test]
    fn test_memory_store_clear_and_stats() {
        let store = MemoryStore::new();
        assert_eq!(store.stats().unwrap().average_qes, None);
        put_rx(&store, 0.1);
        put_rx(&store, 0.2);

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.max_depth, Some(1));
        assert_eq!(stats.recent_24h, 2);

        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(put_rx(&store, 0.3).id, 1);
    }

    #[test]
    fn test_memory_store_format_distribution() {
        let store = MemoryStore::new();
        put_rx(&store, 0.1);
        let bell = Circuit::bell().unwrap();
        let metrics = MetricsEngine::default().analyze(&bell);
        let provenance = Provenance::new("cirq").with_notes("from notebook");
        let stored = store.put(&bell, &metrics, &provenance).unwrap();
        assert_eq!(stored.notes.as_deref(), Some("from notebook"));

        // A duplicate keeps the first submission's format.
        store.put(&bell, &metrics, &Provenance::new("json")).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.format_distribution.get("qasm"), Some(&1));
        assert_eq!(stats.format_distribution.get("cirq"), Some(&1));
        assert!(!stats.format_distribution.contains_key("json"));
    }
}
