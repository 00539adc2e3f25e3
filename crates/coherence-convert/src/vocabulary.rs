//! External gate vocabularies and their lookup tables.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;

use coherence_ir::{GateKind, StandardGate};

use crate::error::{ConvertError, ConvertResult};

/// Shape of the source text a vocabulary reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStyle {
    /// OpenQASM 2 text: `cx q[0],q[1];`.
    Qasm,
    /// Cirq Python: `circuit.append(cirq.CNOT(qubits[0], qubits[1]))`.
    Cirq,
    /// Braket Python, qubits then parameters: `circuit.rz(0, 1.5708)`.
    Braket,
    /// pyQuil Python, parameters then qubits: `program += RZ(1.5708, 0)`.
    Pyquil,
}

impl CallStyle {
    /// Text that identifies source written in this style, if any.
    pub fn signature(self) -> Option<&'static str> {
        match self {
            CallStyle::Qasm => None,
            CallStyle::Cirq => Some("import cirq"),
            CallStyle::Braket => Some("from braket"),
            CallStyle::Pyquil => Some("from pyquil"),
        }
    }
}

/// Angle convention of a vocabulary's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    /// Radians, the IR's own unit.
    #[default]
    Radians,
    /// Degrees; converted at the vocabulary boundary.
    Degrees,
}

impl AngleUnit {
    /// Convert a radian value into this unit.
    #[inline]
    pub fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Radians => value,
            AngleUnit::Degrees => value * 180.0 / PI,
        }
    }

    /// Convert a value in this unit into radians.
    #[inline]
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Radians => value,
            AngleUnit::Degrees => value * PI / 180.0,
        }
    }
}

/// A named external vocabulary: call style, angle unit and gate table.
///
/// The table maps `GateKind → token`; the inverse table used on import is
/// kept alongside it.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    name: String,
    style: CallStyle,
    angle_unit: AngleUnit,
    tokens: FxHashMap<GateKind, String>,
    kinds: FxHashMap<String, GateKind>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new(name: impl Into<String>, style: CallStyle) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            style,
            angle_unit: AngleUnit::Radians,
            tokens: FxHashMap::default(),
            kinds: FxHashMap::default(),
        }
    }

    /// Set the angle unit.
    #[must_use]
    pub fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    /// Map a gate kind to an external token (and back).
    #[must_use]
    pub fn with_gate(mut self, kind: impl Into<GateKind>, token: impl Into<String>) -> Self {
        let kind = kind.into();
        let token = token.into();
        self.kinds.insert(token.clone(), kind.clone());
        self.tokens.insert(kind, token);
        self
    }

    /// Vocabulary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call style.
    pub fn style(&self) -> CallStyle {
        self.style
    }

    /// Angle unit.
    pub fn angle_unit(&self) -> AngleUnit {
        self.angle_unit
    }

    /// External token for a gate kind.
    pub fn token_for(&self, kind: &GateKind) -> Option<&str> {
        self.tokens.get(kind).map(String::as_str)
    }

    /// Gate kind for an external token.
    pub fn kind_for(&self, token: &str) -> Option<&GateKind> {
        self.kinds.get(token)
    }

    /// Canonical names of every supported gate kind, sorted.
    pub fn supported_gates(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tokens.keys().map(GateKind::name).collect();
        names.sort_unstable();
        names
    }

    /// Qiskit: OpenQASM 2 with the canonical gate names.
    pub fn qiskit() -> Self {
        StandardGate::ALL
            .into_iter()
            .fold(Self::new("qiskit", CallStyle::Qasm), |v, g| {
                v.with_gate(g, g.name())
            })
    }

    /// Cirq: `cirq.<TOKEN>` operations on `LineQubit`s.
    pub fn cirq() -> Self {
        use StandardGate as G;
        Self::new("cirq", CallStyle::Cirq)
            .with_gate(G::I, "I")
            .with_gate(G::X, "X")
            .with_gate(G::Y, "Y")
            .with_gate(G::Z, "Z")
            .with_gate(G::H, "H")
            .with_gate(G::S, "S")
            .with_gate(G::T, "T")
            .with_gate(G::Rx, "rx")
            .with_gate(G::Ry, "ry")
            .with_gate(G::Rz, "rz")
            .with_gate(G::CX, "CNOT")
            .with_gate(G::CZ, "CZ")
            .with_gate(G::Swap, "SWAP")
            .with_gate(G::CCX, "CCX")
            .with_gate(G::CSwap, "CSWAP")
            .with_gate(G::Measure, "measure")
            .with_gate(G::Reset, "reset")
    }

    /// Amazon Braket: `circuit.<token>(qubits..., params...)`.
    pub fn braket() -> Self {
        use StandardGate as G;
        Self::new("braket", CallStyle::Braket)
            .with_gate(G::I, "i")
            .with_gate(G::X, "x")
            .with_gate(G::Y, "y")
            .with_gate(G::Z, "z")
            .with_gate(G::H, "h")
            .with_gate(G::S, "s")
            .with_gate(G::Sdg, "si")
            .with_gate(G::T, "t")
            .with_gate(G::Tdg, "ti")
            .with_gate(G::SX, "v")
            .with_gate(G::Rx, "rx")
            .with_gate(G::Ry, "ry")
            .with_gate(G::Rz, "rz")
            .with_gate(G::P, "phaseshift")
            .with_gate(G::CX, "cnot")
            .with_gate(G::CY, "cy")
            .with_gate(G::CZ, "cz")
            .with_gate(G::Swap, "swap")
            .with_gate(G::CP, "cphaseshift")
            .with_gate(G::RZZ, "zz")
            .with_gate(G::CCX, "ccnot")
            .with_gate(G::CSwap, "cswap")
    }

    /// pyQuil: `program += <TOKEN>(params..., qubits...)`.
    pub fn pyquil() -> Self {
        use StandardGate as G;
        Self::new("pyquil", CallStyle::Pyquil)
            .with_gate(G::I, "I")
            .with_gate(G::X, "X")
            .with_gate(G::Y, "Y")
            .with_gate(G::Z, "Z")
            .with_gate(G::H, "H")
            .with_gate(G::S, "S")
            .with_gate(G::T, "T")
            .with_gate(G::Rx, "RX")
            .with_gate(G::Ry, "RY")
            .with_gate(G::Rz, "RZ")
            .with_gate(G::P, "PHASE")
            .with_gate(G::CX, "CNOT")
            .with_gate(G::CZ, "CZ")
            .with_gate(G::Swap, "SWAP")
            .with_gate(G::CP, "CPHASE")
            .with_gate(G::CCX, "CCNOT")
            .with_gate(G::CSwap, "CSWAP")
            .with_gate(G::Reset, "RESET")
    }
}

/// Vocabularies by name.
#[derive(Debug, Clone)]
pub struct VocabularyRegistry {
    vocabularies: BTreeMap<String, Vocabulary>,
}

impl VocabularyRegistry {
    /// A registry with no vocabularies.
    pub fn empty() -> Self {
        Self {
            vocabularies: BTreeMap::new(),
        }
    }

    /// A registry holding `qiskit`, `cirq`, `braket` and `pyquil`.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for vocabulary in [
            Vocabulary::qiskit(),
            Vocabulary::cirq(),
            Vocabulary::braket(),
            Vocabulary::pyquil(),
        ] {
            registry
                .vocabularies
                .insert(vocabulary.name().to_string(), vocabulary);
        }
        registry
    }

    /// Add a vocabulary. Fails if the name is taken.
    pub fn register(&mut self, vocabulary: Vocabulary) -> ConvertResult<()> {
        if self.vocabularies.contains_key(vocabulary.name()) {
            return Err(ConvertError::DuplicateVocabulary(
                vocabulary.name().to_string(),
            ));
        }
        self.vocabularies
            .insert(vocabulary.name().to_string(), vocabulary);
        Ok(())
    }

    /// Look up a vocabulary by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Vocabulary> {
        self.vocabularies.get(&name.to_ascii_lowercase())
    }

    /// Look up a vocabulary, failing with `UnknownVocabulary`.
    pub fn resolve(&self, name: &str) -> ConvertResult<&Vocabulary> {
        self.get(name)
            .ok_or_else(|| ConvertError::UnknownVocabulary(name.to_string()))
    }

    /// Find the vocabulary whose style signature appears in `text`.
    pub fn detect(&self, text: &str) -> Option<&Vocabulary> {
        self.vocabularies.values().find(|v| {
            v.style()
                .signature()
                .is_some_and(|signature| text.contains(signature))
        })
    }

    /// Registered vocabularies, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Vocabulary> {
        self.vocabularies.values()
    }
}

impl Default for VocabularyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
