//! Coherence: Quantum Circuit Conversion and Analysis
//!
//! This crate is the single entry point over the Coherence core. It takes raw
//! circuit bytes with a declared format and returns either a payload or a
//! [`CoreError`] carrying an [`ErrorKind`](coherence_ir::ErrorKind).
//!
//! # Formats
//!
//! | Name | Input | Output |
//! |------|-------|--------|
//! | `auto` | detected | - |
//! | `qasm` | OpenQASM 2 subset | OpenQASM 2 |
//! | `json`, `neutral_json` | neutral JSON | pretty neutral JSON |
//! | `qiskit`, `cirq`, `braket`, `pyquil` | emitted shape | vocabulary source |
//!
//! # Example
//!
//! ```rust
//! use coherence::Coherence;
//!
//! let qasm = b"OPENQASM 2.0;\nqreg q[2];\nh q[0];\ncx q[0],q[1];\n";
//! let coherence = Coherence::in_memory();
//!
//! let converted = coherence.convert(qasm, "auto", "braket").unwrap();
//! assert!(converted.output.contains("circuit.cnot(0, 1)"));
//!
//! let analysis = coherence.analyze(qasm, "qasm").unwrap();
//! assert_eq!(analysis.result.metrics.depth, 2);
//! assert_eq!(coherence.analyze(qasm, "qasm").unwrap().result.id, analysis.result.id);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
mod service;

pub use config::{Config, ConfigError, LoggingConfig, StorageBackend, StorageConfig};
pub use error::{CoreError, CoreResult};
pub use format::Format;
pub use service::{
    AnalyzeOptions, Analysis, Coherence, Comparison, Conversion, Decoded, FormatInfo, MAX_COMPARE, MIN_COMPARE,
    Report,
};

pub use coherence_ir::ErrorKind;
pub use coherence_metrics::{Alert, MetricsConfig, MetricsResult};
pub use coherence_store::{ContentHash, Provenance, ResultSummary, StoreStats, StoredResult};
