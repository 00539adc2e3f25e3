//! Content hashing of canonical circuits.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use coherence_ir::{Circuit, neutral};

use crate::error::{StoreError, StoreResult};

/// SHA-256 of a circuit's canonical neutral JSON, as 64 lowercase hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash a circuit.
    pub fn of(circuit: &Circuit) -> StoreResult<Self> {
        let bytes = neutral::to_canonical_bytes(circuit)?;
        Ok(Self::of_bytes(&bytes))
    }

    /// Hash raw canonical bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for display.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl FromStr for ContentHash {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        let valid = s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(StoreError::InvalidHash(s.to_string()))
        }
    }
}

impl TryFrom<String> for ContentHash {
    type Error = StoreError;

    fn try_from(s: String) -> StoreResult<Self> {
        s.parse()
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coherence_ir::{GateRegistry, QubitId};

    #[test]
    fn test_known_digest() {
        // sha256("")
        assert_eq!(
            ContentHash::of_bytes(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_builder_and_json_hash_identically() {
        let json = r#"{"gates":[{"name":"H","qubits":[0]},{"name":"cnot","qubits":[0,1],"params":[]}],"num_qubits":2}"#;

        let mut builder = Circuit::builder(2);
        builder.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let built = builder.build().unwrap();
        let from_json = neutral::from_str(json, &GateRegistry::standard()).unwrap();

        let expected = ContentHash::of(&built).unwrap();
        assert_eq!(ContentHash::of(&from_json).unwrap(), expected);
        assert_eq!(expected.as_str().len(), 64);
    }

    #[test]
    fn test_negative_zero_normalized() {
        let mut a = Circuit::builder(1);
        a.rz(0.0, QubitId(0)).unwrap();
        let mut b = Circuit::builder(1);
        b.rz(-0.0, QubitId(0)).unwrap();
        assert_eq!(
            ContentHash::of(&a.build().unwrap()).unwrap(),
            ContentHash::of(&b.build().unwrap()).unwrap()
        );
    }

    #[test]
    fn test_parse() {
        let hash = ContentHash::of_bytes(b"x");
        assert_eq!(hash.as_str().parse::<ContentHash>().unwrap(), hash);
        assert!("ABC".parse::<ContentHash>().is_err());
        assert!(hash.as_str().to_uppercase().parse::<ContentHash>().is_err());
        assert_eq!(hash.short().len(), 12);
    }
}
