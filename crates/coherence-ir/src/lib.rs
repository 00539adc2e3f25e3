//! Coherence Intermediate Circuit Representation
//!
//! This crate provides the canonical circuit value every other Coherence
//! crate works against: the gate vocabulary, the circuit itself, and its
//! neutral JSON form.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] addresses a qubit in the circuit's single register
//! - **Gate kinds**: [`StandardGate`] for built-in kinds and [`CustomGate`] for
//!   kinds registered at runtime, unified as [`GateKind`]
//! - **Registry**: [`GateRegistry`] resolves names (case-insensitive, with
//!   aliases) to kinds; parsers and converters never hard-code arity
//! - **Gates**: [`Gate`] is a validated application of a kind to qubits
//! - **Circuit**: [`Circuit`] is immutable; build it with [`CircuitBuilder`]
//! - **Neutral JSON**: [`neutral`] reads and writes the JSON form
//! - **Errors**: [`ErrorKind`] is the classification shared across the workspace
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use coherence_ir::{Circuit, QubitId};
//!
//! let mut builder = Circuit::builder(2);
//! builder.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
//! let circuit = builder.build()?;
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_gates(), 2);
//! # Ok::<(), coherence_ir::IrError>(())
//! ```
//!
//! # Example: Neutral JSON
//!
//! ```rust
//! use coherence_ir::{neutral, GateRegistry};
//!
//! let registry = GateRegistry::standard();
//! let circuit = neutral::from_str(
//!     r#"{"num_qubits": 2, "gates": [{"name": "h", "qubits": [0]}]}"#,
//!     &registry,
//! ).unwrap();
//!
//! let text = neutral::to_string(&circuit).unwrap();
//! assert_eq!(text, r#"{"num_qubits":2,"gates":[{"name":"h","qubits":[0],"params":[]}]}"#);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Params | Aliases |
//! |------|--------|--------|---------|
//! | `id`, `x`, `y`, `z` | 1 | 0 | `i` |
//! | `h`, `s`, `sdg`, `t`, `tdg`, `sx` | 1 | 0 | |
//! | `rx`, `ry`, `rz`, `p` | 1 | 1 | `phase` |
//! | `u` | 1 | 3 | `u3` |
//! | `cx`, `cy`, `cz`, `ch`, `swap` | 2 | 0 | `cnot` |
//! | `crz`, `cp`, `rzz` | 2 | 1 | |
//! | `ccx`, `cswap` | 3 | 0 | `toffoli`, `fredkin` |
//! | `measure`, `reset` | 1 | 0 | |
//! | `barrier` | ≥ 1 | 0 | |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod neutral;
pub mod qubit;
pub mod registry;

pub use circuit::{Circuit, CircuitBuilder};
pub use error::{ErrorKind, IrError, IrResult, JsonError, Operand};
pub use gate::{Arity, CustomGate, Gate, GateKind, StandardGate};
pub use neutral::JsonResult;
pub use qubit::QubitId;
pub use registry::GateRegistry;
