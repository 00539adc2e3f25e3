//! The call contract: raw bytes in, payload or [`CoreError`] out.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use coherence_convert::{Vocabulary, VocabularyRegistry, parse_external, to_vocabulary};
use coherence_ir::{Circuit, ErrorKind, GateRegistry, neutral};
use coherence_metrics::{Alert, MetricsConfig, MetricsEngine, MetricsResult};
use coherence_store::{
    MemoryStore, Provenance, ResultStore, ResultSummary, SqliteStore, StoreStats, StoredResult,
};

use crate::config::{Config, ConfigError, StorageBackend};
use crate::error::{CoreError, CoreResult};
use crate::format::{Format, format_names};

/// Smallest number of results a comparison accepts.
pub const MIN_COMPARE: usize = 2;
/// Largest number of results a comparison accepts.
pub const MAX_COMPARE: usize = 10;

/// A circuit decoded from raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub circuit: Circuit,
    /// The declared format, or the detected one for `auto`.
    pub format: Format,
}

/// Output of [`Coherence::convert`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub source_format: Format,
    pub target_format: Format,
    pub output: String,
}

/// Output of [`Coherence::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub source_format: Format,
    pub result: StoredResult,
    pub alerts: Vec<Alert>,
}

/// Per-call settings for [`Coherence::analyze_with`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeOptions {
    /// Replaces the configured metrics model for this call only.
    pub metrics: Option<MetricsConfig>,
    /// Stored with the result on first insert.
    pub notes: Option<String>,
}

impl AnalyzeOptions {
    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A stored result with alerts evaluated against the current thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub result: StoredResult,
    pub alerts: Vec<Alert>,
}

/// One row of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    #[serde(flatten)]
    pub summary: ResultSummary,
    pub metrics: MetricsResult,
}

/// A supported format and, for vocabularies, the gates it maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatInfo {
    pub name: String,
    /// Gate names the format can represent.
    pub gates: Vec<String>,
}

/// Entry point to parsing, conversion, analysis and storage.
///
/// The store handle is explicit; two instances over different stores never
/// share state.
#[derive(Clone)]
pub struct Coherence {
    gates: GateRegistry,
    vocabularies: VocabularyRegistry,
    engine: MetricsEngine,
    store: Arc<dyn ResultStore>,
}

impl std::fmt::Debug for Coherence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coherence")
            .field("vocabularies", &self.vocabularies)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Coherence {
    /// Build from configuration, opening the configured store.
    pub fn open(config: &Config) -> CoreResult<Self> {
        let engine = MetricsEngine::new(config.metrics.clone()).map_err(ConfigError::from)?;
        let store: Arc<dyn ResultStore> = match config.storage.backend {
            StorageBackend::Sqlite => {
                let path = config.storage.resolved_path();
                Arc::new(SqliteStore::open_with(
                    &path,
                    config.storage.busy_timeout(),
                    GateRegistry::standard(),
                )?)
            }
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(engine, store))
    }

    /// Build around an existing engine and store.
    pub fn new(engine: MetricsEngine, store: Arc<dyn ResultStore>) -> Self {
        Self {
            gates: GateRegistry::standard(),
            vocabularies: VocabularyRegistry::builtin(),
            engine,
            store,
        }
    }

    /// Default metrics over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MetricsEngine::default(), Arc::new(MemoryStore::new()))
    }

    /// Add a vocabulary usable as an input or target format.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> CoreResult<Self> {
        self.vocabularies.register(vocabulary)?;
        Ok(self)
    }

    pub fn store(&self) -> &dyn ResultStore {
        self.store.as_ref()
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    pub fn vocabularies(&self) -> &VocabularyRegistry {
        &self.vocabularies
    }

    /// Decode raw bytes in `declared` format (`auto` detects).
    #[instrument(skip(self, raw), fields(bytes = raw.len()))]
    pub fn decode(&self, raw: &[u8], declared: &str) -> CoreResult<Decoded> {
        let text = std::str::from_utf8(raw).map_err(|e| {
            CoreError::new(ErrorKind::Syntax, format!("Input is not valid UTF-8: {e}"))
        })?;
        let format = match Format::from_name(declared, &self.vocabularies)? {
            Some(format) => format,
            None => {
                let detected = Format::detect(text, &self.vocabularies);
                debug!(format = %detected, "detected input format");
                detected
            }
        };

        let circuit = match &format {
            Format::Qasm => coherence_qasm::parse_with(text, &self.gates)?,
            Format::NeutralJson => neutral::from_str(text, &self.gates)?,
            Format::Vocabulary(name) => {
                let vocabulary = self.vocabularies.resolve(name)?;
                parse_external(text, vocabulary, &self.gates)?
            }
        };
        debug!(
            qubits = circuit.num_qubits(),
            gates = circuit.num_gates(),
            "decoded circuit"
        );
        Ok(Decoded { circuit, format })
    }

    /// Render a circuit in `target`.
    pub fn render(&self, circuit: &Circuit, target: &Format) -> CoreResult<String> {
        Ok(match target {
            Format::Qasm => coherence_qasm::emit(circuit),
            Format::NeutralJson => neutral::to_string_pretty(circuit)?,
            Format::Vocabulary(name) => to_vocabulary(circuit, self.vocabularies.resolve(name)?)?,
        })
    }

    /// Convert raw input to another format. Nothing is stored.
    #[instrument(skip(self, raw))]
    pub fn convert(&self, raw: &[u8], declared: &str, target: &str) -> CoreResult<Conversion> {
        let target_format = Format::target(target, &self.vocabularies)?;
        let decoded = self.decode(raw, declared)?;
        let output = self.render(&decoded.circuit, &target_format)?;
        info!(from = %decoded.format, to = %target_format, "converted circuit");
        Ok(Conversion {
            source_format: decoded.format,
            target_format,
            output,
        })
    }

    /// Metrics and alerts for a circuit, without storing it.
    pub fn evaluate(&self, circuit: &Circuit) -> (MetricsResult, Vec<Alert>) {
        let metrics = self.engine.analyze(circuit);
        let alerts = self.engine.alerts(&metrics);
        (metrics, alerts)
    }

    /// Decode, measure and store a circuit.
    ///
    /// A circuit already in the store returns its existing row.
    pub fn analyze(&self, raw: &[u8], declared: &str) -> CoreResult<Analysis> {
        self.analyze_with(raw, declared, &AnalyzeOptions::default())
    }

    /// [`Coherence::analyze`] with per-call metrics and notes.
    ///
    /// The override is validated before the input is decoded. A duplicate
    /// circuit keeps the metrics, format and notes of its first insert; alerts
    /// are evaluated against the thresholds of this call.
    #[instrument(skip(self, raw, options))]
    pub fn analyze_with(
        &self,
        raw: &[u8],
        declared: &str,
        options: &AnalyzeOptions,
    ) -> CoreResult<Analysis> {
        let override_engine = options
            .metrics
            .clone()
            .map(MetricsEngine::new)
            .transpose()
            .map_err(ConfigError::from)?;
        let engine = override_engine.as_ref().unwrap_or(&self.engine);

        let decoded = self.decode(raw, declared)?;
        let metrics = engine.analyze(&decoded.circuit);
        let mut provenance = Provenance::new(decoded.format.name());
        if let Some(notes) = &options.notes {
            provenance = provenance.with_notes(notes.as_str());
        }
        let result = self.store.put(&decoded.circuit, &metrics, &provenance)?;
        let alerts = engine.alerts(&result.metrics);
        info!(
            id = result.id,
            hash = result.content_hash.short(),
            qes = result.metrics.qes,
            "analyzed circuit"
        );
        Ok(Analysis {
            source_format: decoded.format,
            result,
            alerts,
        })
    }

    /// One stored result with alerts.
    pub fn result(&self, id: i64) -> CoreResult<Report> {
        let result = self.store.get(id)?;
        let alerts = self.engine.alerts(&result.metrics);
        Ok(Report { result, alerts })
    }

    /// A page of stored results, oldest first.
    pub fn results(&self, page: usize, page_size: usize) -> CoreResult<Vec<ResultSummary>> {
        Ok(self.store.list(page, page_size)?)
    }

    /// Side-by-side metrics of 2 to 10 distinct stored results, in the order given.
    #[instrument(skip(self))]
    pub fn compare(&self, ids: &[i64]) -> CoreResult<Vec<Comparison>> {
        if !(MIN_COMPARE..=MAX_COMPARE).contains(&ids.len()) {
            return Err(CoreError::validation(format!(
                "Comparison needs between {MIN_COMPARE} and {MAX_COMPARE} ids, got {}",
                ids.len()
            )));
        }
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(CoreError::validation(format!("Duplicate id {id} in comparison")));
            }
        }
        Ok(self
            .store
            .get_many(ids)?
            .into_iter()
            .map(|result| Comparison {
                summary: result.summary(),
                metrics: result.metrics,
            })
            .collect())
    }

    pub fn stats(&self) -> CoreResult<StoreStats> {
        Ok(self.store.stats()?)
    }

    /// Delete every stored result. Returns the number removed.
    pub fn clear(&self) -> CoreResult<usize> {
        Ok(self.store.clear()?)
    }

    /// Every supported format with the gates it can represent.
    pub fn formats(&self) -> Vec<FormatInfo> {
        let all_gates: Vec<String> = self.gates.kinds().iter().map(|k| k.name().to_string()).collect();
        format_names(&self.vocabularies)
            .into_iter()
            .map(|name| {
                let gates = match self.vocabularies.get(&name) {
                    Some(vocabulary) => vocabulary
                        .supported_gates()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    None => all_gates.clone(),
                };
                FormatInfo { name, gates }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\n\
                           h q[0];\ncx q[0],q[1];\nrz(1.5708) q[2];\n";

    #[test]
    fn test_decode_auto() {
        let coherence = Coherence::in_memory();
        let decoded = coherence.decode(EXAMPLE.as_bytes(), "auto").unwrap();
        assert_eq!(decoded.format, Format::Qasm);
        assert_eq!(decoded.circuit.num_gates(), 3);
    }

    #[test]
    fn test_decode_rejects_bad_utf8() {
        let err = Coherence::in_memory().decode(&[0xff, 0xfe], "qasm").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_convert_to_vocabulary_without_rz() {
        let coherence = Coherence::in_memory()
            .with_vocabulary(
                Vocabulary::new("minimal", coherence_convert::CallStyle::Braket)
                    .with_gate(coherence_ir::StandardGate::H, "h")
                    .with_gate(coherence_ir::StandardGate::CX, "cnot"),
            )
            .unwrap();
        let err = coherence
            .convert(EXAMPLE.as_bytes(), "qasm", "minimal")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedGate);
        assert!(err.message.contains("'rz'"), "{}", err.message);
    }

    #[test]
    fn test_analyze_dedups() {
        let coherence = Coherence::in_memory();
        let first = coherence.analyze(EXAMPLE.as_bytes(), "qasm").unwrap();
        assert_eq!(first.result.metrics.num_gates, 3);
        assert_eq!(first.result.metrics.depth, 2);

        let json = neutral::to_string(&first.result.circuit).unwrap();
        let second = coherence.analyze(json.as_bytes(), "json").unwrap();
        assert_eq!(second.source_format, Format::NeutralJson);
        assert_eq!(second.result.id, first.result.id);
        assert_eq!(coherence.store().count().unwrap(), 1);
    }

    #[test]
    fn test_analyze_records_provenance() {
        let coherence = Coherence::in_memory();
        let options = AnalyzeOptions::default().with_notes("bell pair, run 3");
        let first = coherence
            .analyze_with(EXAMPLE.as_bytes(), "auto", &options)
            .unwrap();
        assert_eq!(first.result.source_format, "qasm");
        assert_eq!(first.result.notes.as_deref(), Some("bell pair, run 3"));

        let json = neutral::to_string(&first.result.circuit).unwrap();
        let again = coherence.analyze(json.as_bytes(), "json").unwrap();
        assert_eq!(again.result.source_format, "qasm");
        assert_eq!(again.result.notes.as_deref(), Some("bell pair, run 3"));

        let stats = coherence.stats().unwrap();
        assert_eq!(stats.format_distribution.get("qasm"), Some(&1));
        assert_eq!(stats.format_distribution.len(), 1);
    }

    #[test]
    fn test_analyze_with_metrics_override() {
        let coherence = Coherence::in_memory();
        let mut config = MetricsConfig::default();
        config.error_rates.two_qubit = 0.1;
        config.alerts.min_fidelity = 0.95;
        let options = AnalyzeOptions::default().with_metrics(config);

        let tuned = coherence
            .analyze_with(EXAMPLE.as_bytes(), "qasm", &options)
            .unwrap();
        let baseline = coherence.evaluate(&tuned.result.circuit).0;
        assert!(tuned.result.metrics.fidelity < baseline.fidelity);
        assert!(
            tuned
                .alerts
                .iter()
                .any(|a| matches!(a, Alert::LowFidelity { .. }))
        );
        // The configured engine is untouched.
        assert_eq!(coherence.engine().config(), &MetricsConfig::default());
    }

    #[test]
    fn test_analyze_with_invalid_override() {
        let coherence = Coherence::in_memory();
        let mut config = MetricsConfig::default();
        config.error_rates.two_qubit = 1.5;
        let options = AnalyzeOptions::default().with_metrics(config);

        let err = coherence
            .analyze_with(EXAMPLE.as_bytes(), "qasm", &options)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(coherence.store().count().unwrap(), 0);
    }

    #[test]
    fn test_compare_bounds() {
        let coherence = Coherence::in_memory();
        assert_eq!(coherence.compare(&[1]).unwrap_err().kind, ErrorKind::Validation);
        let eleven: Vec<i64> = (1..=11).collect();
        assert_eq!(coherence.compare(&eleven).unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(coherence.compare(&[1, 1]).unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(coherence.compare(&[1, 2]).unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_formats_list_vocabulary_gates() {
        let formats = Coherence::in_memory().formats();
        let braket = formats.iter().find(|f| f.name == "braket").unwrap();
        assert!(braket.gates.iter().any(|g| g == "cx"));
        let qasm = formats.iter().find(|f| f.name == "qasm").unwrap();
        assert!(qasm.gates.len() >= braket.gates.len());
    }
}
