//! Converter error types.

use coherence_ir::{ErrorKind, IrError};
use coherence_qasm::ParseError;
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting to or from a vocabulary.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// No vocabulary registered under this name.
    #[error("Unknown vocabulary '{0}'")]
    UnknownVocabulary(String),

    /// A vocabulary with this name is already registered.
    #[error("Vocabulary '{0}' is already registered")]
    DuplicateVocabulary(String),

    /// The target vocabulary has no mapping for a gate kind.
    #[error("Gate '{gate}' is not supported by vocabulary '{vocabulary}'")]
    UnsupportedGate { gate: String, vocabulary: String },

    /// Malformed external source.
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// External token with no entry in the vocabulary's inverse table.
    #[error("Unknown gate token '{token}' for vocabulary '{vocabulary}' at line {line}")]
    UnknownToken {
        line: usize,
        token: String,
        vocabulary: String,
    },

    /// IR error while building an imported gate.
    #[error("Line {line}: {source}")]
    Gate {
        line: usize,
        #[source]
        source: IrError,
    },

    /// Error from the QASM reader.
    #[error(transparent)]
    Qasm(#[from] ParseError),
}

impl ConvertError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::UnknownVocabulary(_) | ConvertError::DuplicateVocabulary(_) => {
                ErrorKind::Validation
            }
            ConvertError::UnsupportedGate { .. } => ErrorKind::UnsupportedGate,
            ConvertError::Syntax { .. } => ErrorKind::Syntax,
            ConvertError::UnknownToken { .. } => ErrorKind::UnknownGateKind,
            ConvertError::Gate { source, .. } => source.kind(),
            ConvertError::Qasm(e) => e.kind(),
        }
    }
}
