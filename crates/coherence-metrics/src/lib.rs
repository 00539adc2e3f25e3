//! Circuit Metrics for Coherence
//!
//! Computes structural and physical estimates over a validated
//! [`Circuit`](coherence_ir::Circuit):
//!
//! | Metric | Definition |
//! |--------|------------|
//! | depth | greedy layering; a gate sits one layer above its qubits' last gate |
//! | gate counts | occurrences per canonical gate name |
//! | fidelity | `Π (1 - error_rate(kind))`, optionally `× exp(-depth / t)` |
//! | energy | `Σ cost(kind) + num_qubits × qubit_overhead` |
//! | E1 | `fidelity / (energy + ε)` |
//! | QES | `w1·fidelity + w2·E1 − w3·depth/gates − w4·(gates/qubits)/scale` |
//!
//! All constants come from [`MetricsConfig`]. Analysis is a pure function of
//! the circuit and the configuration and never fails.
//!
//! # Example
//!
//! ```rust
//! use coherence_ir::{Circuit, QubitId};
//! use coherence_metrics::{Alert, MetricsEngine};
//!
//! let mut builder = Circuit::builder(3);
//! builder.h(QubitId(0)).unwrap();
//! builder.cx(QubitId(0), QubitId(1)).unwrap();
//! builder.rz(1.5708, QubitId(2)).unwrap();
//! let circuit = builder.build().unwrap();
//!
//! let engine = MetricsEngine::default();
//! let metrics = engine.analyze(&circuit);
//! assert_eq!(metrics.num_gates, 3);
//! assert_eq!(metrics.depth, 2);
//! assert!(metrics.fidelity > 0.98);
//! assert!(engine.alerts(&metrics).iter().all(|a| matches!(a, Alert::NoIssues)));
//! ```

mod alert;
mod config;
mod engine;
mod error;

pub use alert::Alert;
pub use config::{AlertThresholds, EnergyCosts, ErrorRates, MetricsConfig, QesWeights};
pub use engine::{MetricsEngine, MetricsResult, depth, gate_counts, layers};
pub use error::{ConfigError, ConfigResult};
