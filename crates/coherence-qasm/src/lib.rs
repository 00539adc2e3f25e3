//! `OpenQASM` 2 Parser and Emitter for Coherence
//!
//! This crate reads and writes the OpenQASM-2-like text format against the
//! canonical [`Circuit`](coherence_ir::Circuit).
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ skipped | `OPENQASM 2.0;` |
//! | Includes | ✅ skipped | `include "qelib1.inc";` |
//! | One quantum register | ✅ | `qreg q[5];` |
//! | Gates from the registry | ✅ | `h q[0];`, `cx q[0],q[1];` |
//! | Real-literal parameters | ✅ | `rz(-1.5e-3) q[0];` |
//! | Measurement, reset, barrier | ✅ | `measure q[0];` |
//! | Comments | ✅ | `// line`, `/* block */` |
//! | Classical registers | ❌ `UnsupportedConstruct` | `creg c[2];` |
//! | Gate definitions | ❌ `UnsupportedConstruct` | `gate foo a { x a; }` |
//! | Classical control | ❌ `UnsupportedConstruct` | `if (c == 1) x q[0];` |
//!
//! # Example: Parsing QASM
//!
//! ```rust
//! use coherence_qasm::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[3];
//!     h q[0];
//!     cx q[0],q[1];
//!     rz(1.5708) q[2];
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.num_gates(), 3);
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use coherence_ir::Circuit;
//! use coherence_qasm::{emit, parse};
//!
//! let circuit = Circuit::qft(3).unwrap();
//! let text = emit(&circuit);
//! assert!(text.contains("cp(1.5707963268) q[1],q[0];"));
//!
//! let reparsed = parse(&text).unwrap();
//! assert!(reparsed.approx_eq(&circuit, 1e-9));
//! ```

mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::{REGISTER, emit, format_params};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_with};
