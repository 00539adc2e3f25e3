//! Error types for the IR crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::gate::Arity;
use crate::qubit::QubitId;

/// Coarse classification shared by every error in the workspace.
///
/// Callers outside the core (an HTTP layer, the CLI) map these to status
/// codes or exit codes; the core never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input text.
    Syntax,
    /// Well-formed but semantically invalid input.
    Validation,
    /// A gate name that no registry entry resolves.
    UnknownGateKind,
    /// Wrong number of qubits or parameters for a gate kind.
    ArityMismatch,
    /// Recognized syntax that is deliberately out of scope.
    UnsupportedConstruct,
    /// A conversion target without a mapping for a gate kind.
    UnsupportedGate,
    /// Store lookup miss.
    NotFound,
    /// Persistence layer failure.
    StorageUnavailable,
}

impl ErrorKind {
    /// Stable name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::UnknownGateKind => "UnknownGateKind",
            ErrorKind::ArityMismatch => "ArityMismatch",
            ErrorKind::UnsupportedConstruct => "UnsupportedConstruct",
            ErrorKind::UnsupportedGate => "UnsupportedGate",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::StorageUnavailable => "StorageUnavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operand list of a gate that an arity check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// The qubit list.
    Qubits,
    /// The parameter list.
    Params,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Qubits => f.write_str("qubits"),
            Operand::Params => f.write_str("parameters"),
        }
    }
}

/// Errors that can occur while building IR values.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name not present in the registry.
    #[error("Unknown gate kind '{0}'")]
    UnknownGateKind(String),

    /// Gate received the wrong number of qubits or parameters.
    #[error("Gate '{gate}' expects {expected} {operand}, got {got}")]
    ArityMismatch {
        /// Name of the gate.
        gate: String,
        /// Which operand list is wrong.
        operand: Operand,
        /// Declared arity.
        expected: Arity,
        /// Actual count.
        got: usize,
    },

    /// Same qubit used twice in one gate.
    #[error("Duplicate qubit {qubit} in gate '{gate}'")]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate: String,
    },

    /// Qubit index outside the circuit's register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit circuit (gate #{gate_index} '{gate}')")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Register size.
        num_qubits: u32,
        /// Name of the gate.
        gate: String,
        /// Position of the gate in program order.
        gate_index: usize,
    },

    /// Circuit declared with zero qubits.
    #[error("Circuit must have at least one qubit")]
    EmptyRegister,

    /// Parameter is NaN or infinite.
    #[error("Non-finite parameter {value} in gate '{gate}'")]
    NonFiniteParameter {
        /// Name of the gate.
        gate: String,
        /// The rejected value.
        value: f64,
    },

    /// Registry already holds an entry under this name.
    #[error("Gate name '{0}' is already registered")]
    DuplicateGateName(String),
}

impl IrError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IrError::UnknownGateKind(_) => ErrorKind::UnknownGateKind,
            IrError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            IrError::DuplicateQubit { .. }
            | IrError::QubitOutOfRange { .. }
            | IrError::EmptyRegister
            | IrError::NonFiniteParameter { .. }
            | IrError::DuplicateGateName(_) => ErrorKind::Validation,
        }
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

/// Errors produced by the neutral JSON reader.
///
/// Validation variants carry a JSON-pointer path to the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum JsonError {
    /// Input is not JSON at all.
    #[error("Malformed JSON at line {line}, column {column}: {message}")]
    Malformed {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Decoder message.
        message: String,
    },

    /// Shape, range or bounds violation.
    #[error("Invalid value at '{path}': {message}")]
    Invalid {
        /// JSON pointer to the field.
        path: String,
        /// What is wrong.
        message: String,
    },

    /// Gate name not present in the registry.
    #[error("Unknown gate kind '{name}' at '{path}'")]
    UnknownGateKind {
        /// JSON pointer to the `name` field.
        path: String,
        /// The unresolved name.
        name: String,
    },

    /// Wrong number of qubits or parameters.
    #[error("Gate '{gate}' expects {expected} {operand}, got {got} (at '{path}')")]
    ArityMismatch {
        /// JSON pointer to the operand list.
        path: String,
        /// Name of the gate.
        gate: String,
        /// Which operand list is wrong.
        operand: Operand,
        /// Declared arity.
        expected: Arity,
        /// Actual count.
        got: usize,
    },

    /// Serializer failure while writing JSON.
    #[error("JSON encoding failed: {0}")]
    Encode(String),
}

impl JsonError {
    pub(crate) fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        JsonError::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonError::Malformed { .. } => ErrorKind::Syntax,
            JsonError::Invalid { .. } | JsonError::Encode(_) => ErrorKind::Validation,
            JsonError::UnknownGateKind { .. } => ErrorKind::UnknownGateKind,
            JsonError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
        }
    }

    /// JSON pointer to the offending field, if the error has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            JsonError::Malformed { .. } | JsonError::Encode(_) => None,
            JsonError::Invalid { path, .. }
            | JsonError::UnknownGateKind { path, .. }
            | JsonError::ArityMismatch { path, .. } => Some(path),
        }
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        JsonError::Malformed {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}
