//! Cross-vocabulary conversion for Coherence circuits.
//!
//! A [`Vocabulary`] pairs a call style with a gate table mapping each
//! supported [`GateKind`](coherence_ir::GateKind) to an external token.
//! [`to_vocabulary`] renders a circuit with that table and
//! [`parse_external`] reads the rendered shape back.
//!
//! # Built-in Vocabularies
//!
//! | Name | Style | Example line |
//! |------|-------|--------------|
//! | `qiskit` | OpenQASM 2 | `cx q[0],q[1];` |
//! | `cirq` | Cirq Python | `circuit.append(cirq.CNOT(qubits[0], qubits[1]))` |
//! | `braket` | Braket Python | `circuit.cnot(0, 1)` |
//! | `pyquil` | pyQuil Python | `program += RZ(1.5708, 0)` |
//!
//! # Example
//!
//! ```rust
//! use coherence_convert::{VocabularyRegistry, parse_external, to_vocabulary};
//! use coherence_ir::{Circuit, GateRegistry};
//!
//! let vocabularies = VocabularyRegistry::builtin();
//! let cirq = vocabularies.resolve("cirq").unwrap();
//!
//! let bell = Circuit::bell().unwrap();
//! let source = to_vocabulary(&bell, cirq).unwrap();
//! assert!(source.contains("circuit.append(cirq.CNOT(qubits[0], qubits[1]))"));
//!
//! let back = parse_external(&source, cirq, &GateRegistry::standard()).unwrap();
//! assert_eq!(back, bell);
//! ```

mod emit;
mod error;
mod import;
mod lexer;
mod vocabulary;

pub use emit::to_vocabulary;
pub use error::{ConvertError, ConvertResult};
pub use import::parse_external;
pub use vocabulary::{AngleUnit, CallStyle, Vocabulary, VocabularyRegistry};
