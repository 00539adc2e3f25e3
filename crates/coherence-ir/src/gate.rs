//! Gate kinds and gate applications.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult, Operand};
use crate::qubit::QubitId;

/// Number of qubits a gate kind acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Exactly `n` operands.
    Exactly(u32),
    /// `n` or more operands (n-ary kinds such as `barrier`).
    AtLeast(u32),
}

impl Arity {
    /// Check whether `count` operands satisfy this arity.
    #[inline]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n as usize,
            Arity::AtLeast(n) => count >= n as usize,
        }
    }

    /// The smallest operand count this arity accepts.
    #[inline]
    pub fn min(self) -> u32 {
        match self {
            Arity::Exactly(n) | Arity::AtLeast(n) => n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Built-in gate kinds.
///
/// Kinds are fieldless tags; parameters live on [`Gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Phase gate.
    P,
    /// Universal single-qubit gate U(θ, φ, λ).
    U,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around Z.
    CRz,
    /// Controlled phase gate.
    CP,
    /// ZZ rotation gate.
    RZZ,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,

    // Non-unitary operations
    /// Computational-basis measurement.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Scheduling barrier across one or more qubits.
    Barrier,
}

impl StandardGate {
    /// Every built-in kind, in declaration order.
    pub const ALL: [StandardGate; 28] = [
        StandardGate::I,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
        StandardGate::SX,
        StandardGate::Rx,
        StandardGate::Ry,
        StandardGate::Rz,
        StandardGate::P,
        StandardGate::U,
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::CRz,
        StandardGate::CP,
        StandardGate::RZZ,
        StandardGate::CCX,
        StandardGate::CSwap,
        StandardGate::Measure,
        StandardGate::Reset,
        StandardGate::Barrier,
    ];

    /// Canonical lowercase name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx => "rx",
            StandardGate::Ry => "ry",
            StandardGate::Rz => "rz",
            StandardGate::P => "p",
            StandardGate::U => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRz => "crz",
            StandardGate::CP => "cp",
            StandardGate::RZZ => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
            StandardGate::Measure => "measure",
            StandardGate::Reset => "reset",
            StandardGate::Barrier => "barrier",
        }
    }

    /// Qubit arity of this gate.
    #[inline]
    pub fn arity(self) -> Arity {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::P
            | StandardGate::U
            | StandardGate::Measure
            | StandardGate::Reset => Arity::Exactly(1),

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRz
            | StandardGate::CP
            | StandardGate::RZZ => Arity::Exactly(2),

            StandardGate::CCX | StandardGate::CSwap => Arity::Exactly(3),

            StandardGate::Barrier => Arity::AtLeast(1),
        }
    }

    /// Number of real-valued parameters.
    #[inline]
    pub fn num_params(self) -> usize {
        match self {
            StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::P
            | StandardGate::CRz
            | StandardGate::CP
            | StandardGate::RZZ => 1,
            StandardGate::U => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate kind registered at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomGate {
    name: String,
    arity: Arity,
    num_params: usize,
}

impl CustomGate {
    /// Create a parameterless custom kind acting on exactly `num_qubits` qubits.
    ///
    /// The name is stored lowercase; lookups are case-insensitive.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            arity: Arity::Exactly(num_qubits),
            num_params: 0,
        }
    }

    /// Set the parameter count.
    #[must_use]
    pub fn with_params(mut self, num_params: usize) -> Self {
        self.num_params = num_params;
        self
    }

    /// Override the qubit arity.
    #[must_use]
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qubit arity.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Parameter count.
    pub fn num_params(&self) -> usize {
        self.num_params
    }
}

/// A gate kind, either built-in or registered at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// A built-in gate.
    Standard(StandardGate),
    /// A runtime-registered gate.
    Custom(CustomGate),
}

impl GateKind {
    /// Canonical name of this kind.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => g.name(),
        }
    }

    /// Qubit arity.
    #[inline]
    pub fn arity(&self) -> Arity {
        match self {
            GateKind::Standard(g) => g.arity(),
            GateKind::Custom(g) => g.arity(),
        }
    }

    /// Parameter count.
    #[inline]
    pub fn num_params(&self) -> usize {
        match self {
            GateKind::Standard(g) => g.num_params(),
            GateKind::Custom(g) => g.num_params(),
        }
    }

    /// The built-in kind, if this is one.
    #[inline]
    pub fn as_standard(&self) -> Option<StandardGate> {
        match self {
            GateKind::Standard(g) => Some(*g),
            GateKind::Custom(_) => None,
        }
    }

    /// Check a qubit and parameter count against this kind.
    pub fn check_arity(&self, num_qubits: usize, num_params: usize) -> IrResult<()> {
        let arity = self.arity();
        if !arity.accepts(num_qubits) {
            return Err(IrError::ArityMismatch {
                gate: self.name().to_string(),
                operand: Operand::Qubits,
                expected: arity,
                got: num_qubits,
            });
        }
        let expected = self.num_params();
        if num_params != expected {
            return Err(IrError::ArityMismatch {
                gate: self.name().to_string(),
                operand: Operand::Params,
                expected: Arity::Exactly(expected as u32),
                got: num_params,
            });
        }
        Ok(())
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl From<CustomGate> for GateKind {
    fn from(gate: CustomGate) -> Self {
        GateKind::Custom(gate)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One gate application: a kind with its ordered qubits and parameters.
///
/// Construction validates arity, qubit uniqueness and parameter finiteness,
/// so every `Gate` value is well-formed. Register bounds are checked by
/// [`Circuit`](crate::Circuit).
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    kind: GateKind,
    qubits: Vec<QubitId>,
    params: Vec<f64>,
}

impl Gate {
    /// Create a validated gate.
    pub fn new(
        kind: impl Into<GateKind>,
        qubits: Vec<QubitId>,
        params: Vec<f64>,
    ) -> IrResult<Self> {
        let kind = kind.into();

        kind.check_arity(qubits.len(), params.len())?;

        let mut seen = FxHashSet::with_capacity_and_hasher(qubits.len(), Default::default());
        if let Some(&qubit) = qubits.iter().find(|q| !seen.insert(**q)) {
            return Err(IrError::DuplicateQubit {
                qubit,
                gate: kind.name().to_string(),
            });
        }

        if let Some(&value) = params.iter().find(|p| !p.is_finite()) {
            return Err(IrError::NonFiniteParameter {
                gate: kind.name().to_string(),
                value,
            });
        }

        Ok(Self {
            kind,
            qubits,
            params,
        })
    }

    /// The gate kind.
    #[inline]
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// Canonical name of the kind.
    #[inline]
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Ordered qubit operands.
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Ordered parameters, in radians.
    #[inline]
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Compare two gates, allowing parameters to differ by at most `tol`.
    pub fn approx_eq(&self, other: &Gate, tol: f64) -> bool {
        self.kind == other.kind
            && self.qubits == other.qubits
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}
