//! Error types for the QASM2 parser.

use coherence_ir::{ErrorKind, IrError};
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input at line {line}: expected {expected}")]
    UnexpectedEof { line: usize, expected: String },

    /// Recognized syntax outside the supported subset.
    #[error("Unsupported construct at line {line}: {construct}")]
    Unsupported { line: usize, construct: String },

    /// Gate statement before any `qreg`, or naming another register.
    #[error("Undeclared register '{name}' at line {line}")]
    UndeclaredRegister { line: usize, name: String },

    /// `qreg` with a zero size.
    #[error("Register '{name}' at line {line} must have at least one qubit")]
    EmptyRegister { line: usize, name: String },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size} at line {line}")]
    IndexOutOfBounds {
        line: usize,
        register: String,
        index: u64,
        size: u32,
    },

    /// Gate name not in the registry.
    #[error("Unknown gate '{name}' in statement {statement} (line {line})")]
    UnknownGate {
        line: usize,
        statement: usize,
        name: String,
    },

    /// IR error while building a gate (arity, duplicate qubit).
    #[error("Statement {statement} (line {line}): {source}")]
    Gate {
        line: usize,
        statement: usize,
        #[source]
        source: IrError,
    },
}

impl ParseError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::LexerError { .. }
            | ParseError::UnexpectedToken { .. }
            | ParseError::UnexpectedEof { .. } => ErrorKind::Syntax,
            ParseError::Unsupported { .. } => ErrorKind::UnsupportedConstruct,
            ParseError::UndeclaredRegister { .. }
            | ParseError::EmptyRegister { .. }
            | ParseError::IndexOutOfBounds { .. } => ErrorKind::Validation,
            ParseError::UnknownGate { .. } => ErrorKind::UnknownGateKind,
            ParseError::Gate { source, .. } => source.kind(),
        }
    }

    /// Source line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ParseError::LexerError { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnexpectedEof { line, .. }
            | ParseError::Unsupported { line, .. }
            | ParseError::UndeclaredRegister { line, .. }
            | ParseError::EmptyRegister { line, .. }
            | ParseError::IndexOutOfBounds { line, .. }
            | ParseError::UnknownGate { line, .. }
            | ParseError::Gate { line, .. } => *line,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
