//! Error type of the call contract.

use coherence_convert::ConvertError;
use coherence_ir::{ErrorKind, IrError, JsonError};
use coherence_qasm::ParseError;
use coherence_store::StoreError;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for facade operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Flattened error returned by every facade operation.
///
/// `path` is a JSON pointer into neutral JSON input when the failure can be
/// located there.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{kind}: {message}")]
pub struct CoreError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CoreError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl From<IrError> for CoreError {
    fn from(err: IrError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<JsonError> for CoreError {
    fn from(err: JsonError) -> Self {
        let core = Self::new(err.kind(), err.to_string());
        match err.path() {
            Some(path) => core.with_path(path),
            None => core,
        }
    }
}

impl From<ParseError> for CoreError {
    fn from(err: ParseError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<ConvertError> for CoreError {
    fn from(err: ConvertError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coherence_ir::GateRegistry;

    #[test]
    fn test_json_error_keeps_path() {
        let json = r#"{"num_qubits": 3, "gates": [{"name": "cx", "qubits": [0, 1, 2]}]}"#;
        let err: CoreError = coherence_ir::neutral::from_str(json, &GateRegistry::standard())
            .unwrap_err()
            .into();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        assert_eq!(err.path.as_deref(), Some("/gates/0/qubits"));
    }

    #[test]
    fn test_display_and_serialize() {
        let err = CoreError::new(ErrorKind::NotFound, "Result 4 not found");
        assert_eq!(err.to_string(), "NotFound: Result 4 not found");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "not_found");
        assert!(value.get("path").is_none());
    }

    #[test]
    fn test_store_error_kind() {
        let err: CoreError = StoreError::Unavailable("disk full".into()).into();
        assert_eq!(err.kind, ErrorKind::StorageUnavailable);
    }
}
