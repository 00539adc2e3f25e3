//! Content-Addressed Result Store for Coherence
//!
//! Persists analysed circuits keyed by the SHA-256 of their canonical neutral
//! JSON. Storing the same circuit twice, from any source format, yields the
//! same row.
//!
//! Two backends implement [`ResultStore`]:
//!
//! - [`SqliteStore`]: a single-file SQLite database, safe to share between
//!   handles and processes.
//! - [`MemoryStore`]: a process-local store for tests and dry runs.
//!
//! # Example
//!
//! ```rust
//! use coherence_ir::Circuit;
//! use coherence_metrics::MetricsEngine;
//! use coherence_store::{MemoryStore, Provenance, ResultStore};
//!
//! let circuit = Circuit::bell().unwrap();
//! let metrics = MetricsEngine::default().analyze(&circuit);
//!
//! let store = MemoryStore::new();
//! let first = store.put(&circuit, &metrics, &Provenance::new("qasm")).unwrap();
//! let again = store.put(&circuit, &metrics, &Provenance::new("cirq")).unwrap();
//! assert_eq!(first.id, again.id);
//! assert_eq!(again.source_format, "qasm");
//! assert_eq!(store.count().unwrap(), 1);
//! ```

mod error;
mod hash;
mod memory;
mod record;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use hash::ContentHash;
pub use memory::MemoryStore;
pub use record::{MAX_PAGE_SIZE, Provenance, ResultSummary, StoreStats, StoredResult};
pub use sqlite::{DEFAULT_BUSY_TIMEOUT, SqliteStore};

use coherence_ir::Circuit;
use coherence_metrics::MetricsResult;

/// Trait for result storage backends.
pub trait ResultStore: Send + Sync {
    /// Insert a result, or return the existing row with the same content hash.
    ///
    /// The returned row is the one persisted, so a duplicate put returns the
    /// original metrics, provenance and timestamp.
    fn put(
        &self,
        circuit: &Circuit,
        metrics: &MetricsResult,
        provenance: &Provenance,
    ) -> StoreResult<StoredResult>;

    /// Fetch one row.
    fn get(&self, id: i64) -> StoreResult<StoredResult>;

    /// Fetch the row for a content hash, if any.
    fn find_by_hash(&self, hash: &ContentHash) -> StoreResult<Option<StoredResult>>;

    /// Fetch several rows in the given order. Any missing id fails the call.
    fn get_many(&self, ids: &[i64]) -> StoreResult<Vec<StoredResult>> {
        ids.iter().map(|&id| self.get(id)).collect()
    }

    /// One page of summaries in insertion order. `page` is 0-based and
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`.
    fn list(&self, page: usize, page_size: usize) -> StoreResult<Vec<ResultSummary>>;

    /// Delete every row and restart ids at 1. Returns the number removed.
    fn clear(&self) -> StoreResult<usize>;

    /// Aggregates over all rows.
    fn stats(&self) -> StoreResult<StoreStats>;

    /// Number of rows.
    fn count(&self) -> StoreResult<usize>;
}
