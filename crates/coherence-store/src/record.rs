//! Stored rows and aggregate views over them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use coherence_ir::Circuit;
use coherence_metrics::MetricsResult;

use crate::hash::ContentHash;

/// Where a result came from. Only the first insert of a circuit records it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Format the circuit was decoded from, e.g. `qasm` or `cirq`.
    pub source_format: String,
    /// Free-form annotation.
    pub notes: Option<String>,
}

impl Provenance {
    pub fn new(source_format: impl Into<String>) -> Self {
        Self {
            source_format: source_format.into(),
            notes: None,
        }
    }

    /// Attach notes; blank text is dropped.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }
}

/// One persisted analysis. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredResult {
    /// Insertion-order id, starting at 1.
    pub id: i64,
    pub content_hash: ContentHash,
    pub circuit: Circuit,
    pub metrics: MetricsResult,
    /// Format of the first submission of this circuit.
    pub source_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredResult {
    /// Summary row for listings.
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            id: self.id,
            content_hash: self.content_hash.clone(),
            num_qubits: self.metrics.num_qubits,
            num_gates: self.metrics.num_gates,
            depth: self.metrics.depth,
            qes: self.metrics.qes,
            source_format: self.source_format.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub id: i64,
    pub content_hash: ContentHash,
    pub num_qubits: u32,
    pub num_gates: usize,
    pub depth: usize,
    pub qes: f64,
    pub source_format: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over the whole store. Averages are `None` when it is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct StoreStats {
    pub total_records: usize,
    pub average_qes: Option<f64>,
    pub average_fidelity: Option<f64>,
    pub average_depth: Option<f64>,
    pub max_depth: Option<usize>,
    /// Rows created in the last 24 hours.
    pub recent_24h: usize,
    /// Row count per first-seen source format.
    pub format_distribution: BTreeMap<String, usize>,
}

/// Bounds applied to `list` page sizes.
pub const MAX_PAGE_SIZE: usize = 500;

pub(crate) fn clamp_page_size(page_size: usize) -> usize {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_drops_blank_notes() {
        assert_eq!(Provenance::new("qasm").with_notes("  ").notes, None);
        let provenance = Provenance::new("cirq").with_notes("run 4, calibrated");
        assert_eq!(provenance.source_format, "cirq");
        assert_eq!(provenance.notes.as_deref(), Some("run 4, calibrated"));
    }
}
