//! Circuit format names and input auto-detection.

use serde::Serialize;
use std::fmt;

use coherence_convert::VocabularyRegistry;

use crate::error::{CoreError, CoreResult};

/// A concrete circuit format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Format {
    /// OpenQASM 2 subset.
    Qasm,
    /// Neutral JSON.
    NeutralJson,
    /// A registered SDK vocabulary, by canonical name.
    Vocabulary(String),
}

impl Format {
    /// Resolve a format name. `json` and `neutral_json` are synonyms.
    ///
    /// Returns `None` for `auto`.
    pub fn from_name(name: &str, vocabularies: &VocabularyRegistry) -> CoreResult<Option<Self>> {
        let lower = name.trim().to_ascii_lowercase();
        let format = match lower.as_str() {
            "auto" => return Ok(None),
            "qasm" | "openqasm" => Format::Qasm,
            "json" | "neutral_json" => Format::NeutralJson,
            other => match vocabularies.get(other) {
                Some(vocabulary) => Format::Vocabulary(vocabulary.name().to_string()),
                None => {
                    return Err(CoreError::validation(format!(
                        "Unknown format '{name}'; expected auto, qasm, json or one of: {}",
                        vocabulary_names(vocabularies).join(", ")
                    )));
                }
            },
        };
        Ok(Some(format))
    }

    /// Resolve a target format name; `auto` is rejected.
    pub fn target(name: &str, vocabularies: &VocabularyRegistry) -> CoreResult<Self> {
        Self::from_name(name, vocabularies)?
            .ok_or_else(|| CoreError::validation("'auto' is only valid as an input format"))
    }

    /// Detect the format of `text`.
    ///
    /// Order: a leading `OPENQASM` header, then any valid JSON document, then
    /// a vocabulary signature, then QASM as the fallback.
    pub fn detect(text: &str, vocabularies: &VocabularyRegistry) -> Self {
        let trimmed = text.trim();
        if trimmed.starts_with("OPENQASM") {
            return Format::Qasm;
        }
        if serde_json::from_str::<serde::de::IgnoredAny>(trimmed).is_ok() {
            return Format::NeutralJson;
        }
        match vocabularies.detect(text) {
            Some(vocabulary) => Format::Vocabulary(vocabulary.name().to_string()),
            None => Format::Qasm,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Format::Qasm => "qasm",
            Format::NeutralJson => "neutral_json",
            Format::Vocabulary(name) => name,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.name().to_string()
    }
}

/// Every accepted format name, core formats first.
pub fn format_names(vocabularies: &VocabularyRegistry) -> Vec<String> {
    let mut names = vec!["qasm".to_string(), "neutral_json".to_string()];
    names.extend(vocabulary_names(vocabularies));
    names
}

fn vocabulary_names(vocabularies: &VocabularyRegistry) -> Vec<String> {
    vocabularies.iter().map(|v| v.name().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coherence_ir::ErrorKind;

    fn registry() -> VocabularyRegistry {
        VocabularyRegistry::builtin()
    }

    #[test]
    fn test_names_and_synonyms() {
        let vocabularies = registry();
        assert_eq!(Format::from_name("auto", &vocabularies).unwrap(), None);
        assert_eq!(
            Format::from_name("json", &vocabularies).unwrap(),
            Some(Format::NeutralJson)
        );
        assert_eq!(
            Format::from_name("neutral_json", &vocabularies).unwrap(),
            Some(Format::NeutralJson)
        );
        assert_eq!(
            Format::from_name("Cirq", &vocabularies).unwrap(),
            Some(Format::Vocabulary("cirq".into()))
        );
        let err = Format::from_name("quil", &vocabularies).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("pyquil"));
    }

    #[test]
    fn test_auto_is_not_a_target() {
        assert!(Format::target("auto", &registry()).is_err());
        assert_eq!(Format::target("qasm", &registry()).unwrap(), Format::Qasm);
    }

    #[test]
    fn test_detect() {
        let vocabularies = registry();
        assert_eq!(
            Format::detect("  OPENQASM 2.0;\nqreg q[1];", &vocabularies),
            Format::Qasm
        );
        assert_eq!(
            Format::detect(r#"{"num_qubits": 1, "gates": []}"#, &vocabularies),
            Format::NeutralJson
        );
        assert_eq!(
            Format::detect("import cirq\nqubits = cirq.LineQubit.range(2)\n", &vocabularies),
            Format::Vocabulary("cirq".into())
        );
        assert_eq!(
            Format::detect("from pyquil import Program\n", &vocabularies),
            Format::Vocabulary("pyquil".into())
        );
        assert_eq!(Format::detect("qreg q[2];", &vocabularies), Format::Qasm);
    }

    #[test]
    fn test_format_names() {
        let names = format_names(&registry());
        assert_eq!(&names[..2], &["qasm", "neutral_json"]);
        assert!(names.iter().any(|n| n == "braket"));
    }
}
