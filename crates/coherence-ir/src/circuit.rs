//! The canonical circuit value and its builder.

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, StandardGate};
use crate::qubit::QubitId;

/// A quantum circuit: a qubit register and an ordered gate list.
///
/// Circuits are immutable once built. Every gate is well-formed and every
/// qubit it references is below [`Circuit::num_qubits`]. Program order is
/// significant.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    num_qubits: u32,
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create a circuit from already-validated gates, checking register bounds.
    pub fn new(num_qubits: u32, gates: Vec<Gate>) -> IrResult<Self> {
        if num_qubits == 0 {
            return Err(IrError::EmptyRegister);
        }
        for (index, gate) in gates.iter().enumerate() {
            check_bounds(num_qubits, gate, index)?;
        }
        Ok(Self { num_qubits, gates })
    }

    /// Start building a circuit over `num_qubits` qubits.
    pub fn builder(num_qubits: u32) -> CircuitBuilder {
        CircuitBuilder::new(num_qubits)
    }

    /// Register size.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Gates in program order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    #[inline]
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Check if the circuit has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Compare two circuits, allowing parameters to differ by at most `tol`.
    pub fn approx_eq(&self, other: &Circuit, tol: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self.gates.len() == other.gates.len()
            && self
                .gates
                .iter()
                .zip(&other.gates)
                .all(|(a, b)| a.approx_eq(b, tol))
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit with measurements.
    pub fn bell() -> IrResult<Self> {
        let mut builder = Self::builder(2);
        builder
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure_all()?;
        builder.build()
    }

    /// Create an `n`-qubit GHZ state circuit with measurements.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut builder = Self::builder(n);
        if n > 0 {
            builder.h(QubitId(0))?;
            for i in 0..n - 1 {
                builder.cx(QubitId(i), QubitId(i + 1))?;
            }
            builder.measure_all()?;
        }
        builder.build()
    }

    /// Create an `n`-qubit QFT circuit (without measurements).
    pub fn qft(n: u32) -> IrResult<Self> {
        use std::f64::consts::PI;

        let mut builder = Self::builder(n);

        for i in 0..n {
            builder.h(QubitId(i))?;

            for j in (i + 1)..n {
                let angle = PI / f64::from(1u32 << (j - i).min(31));
                builder.cp(angle, QubitId(j), QubitId(i))?;
            }
        }

        // Bit reversal
        for i in 0..n / 2 {
            builder.swap(QubitId(i), QubitId(n - 1 - i))?;
        }

        builder.build()
    }
}

fn check_bounds(num_qubits: u32, gate: &Gate, gate_index: usize) -> IrResult<()> {
    match gate.qubits().iter().find(|q| q.0 >= num_qubits) {
        Some(&qubit) => Err(IrError::QubitOutOfRange {
            qubit,
            num_qubits,
            gate: gate.name().to_string(),
            gate_index,
        }),
        None => Ok(()),
    }
}

/// Fluent builder for [`Circuit`].
///
/// Each gate method validates immediately, so an error names the gate that
/// caused it.
///
/// ```rust
/// use coherence_ir::{Circuit, QubitId};
///
/// let mut builder = Circuit::builder(2);
/// builder.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
/// let circuit = builder.build()?;
/// assert_eq!(circuit.num_gates(), 2);
/// # Ok::<(), coherence_ir::IrError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    num_qubits: u32,
    gates: Vec<Gate>,
}

impl CircuitBuilder {
    /// Create a builder over `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            gates: vec![],
        }
    }

    /// Append a gate of any kind.
    pub fn gate(
        &mut self,
        kind: impl Into<GateKind>,
        qubits: Vec<QubitId>,
        params: Vec<f64>,
    ) -> IrResult<&mut Self> {
        let gate = Gate::new(kind, qubits, params)?;
        self.push(gate)
    }

    /// Append a gate built elsewhere.
    pub fn push(&mut self, gate: Gate) -> IrResult<&mut Self> {
        check_bounds(self.num_qubits, &gate, self.gates.len())?;
        self.gates.push(gate);
        Ok(self)
    }

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(gate, vec![qubit], vec![])
    }

    fn rotation(&mut self, gate: StandardGate, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(gate, vec![qubit], vec![theta])
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(StandardGate::Rx, theta, qubit)
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(StandardGate::Ry, theta, qubit)
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(StandardGate::Rz, theta, qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(StandardGate::P, theta, qubit)
    }

    /// Apply U(θ, φ, λ).
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::U, vec![qubit], vec![theta, phi, lambda])
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, vec![control, target], vec![])
    }

    /// Apply controlled-Y gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CY, vec![control, target], vec![])
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, vec![control, target], vec![])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CH, vec![control, target], vec![])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, vec![q1, q2], vec![])
    }

    /// Apply controlled RZ rotation.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CRz, vec![control, target], vec![theta])
    }

    /// Apply controlled phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CP, vec![control, target], vec![theta])
    }

    /// Apply ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::RZZ, vec![q1, q2], vec![theta])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, vec![c1, c2, target], vec![])
    }

    /// Apply Fredkin gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CSwap, vec![control, t1, t2], vec![])
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure one qubit.
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Measure, qubit)
    }

    /// Measure every qubit in index order.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        for i in 0..self.num_qubits {
            self.measure(QubitId(i))?;
        }
        Ok(self)
    }

    /// Reset one qubit.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Reset, qubit)
    }

    /// Add a barrier across `qubits`.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.gate(StandardGate::Barrier, qubits.into_iter().collect(), vec![])
    }

    /// Add a barrier across every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        self.barrier((0..self.num_qubits).map(QubitId))
    }

    /// Finish the circuit.
    pub fn build(self) -> IrResult<Circuit> {
        if self.num_qubits == 0 {
            return Err(IrError::EmptyRegister);
        }
        Ok(Circuit {
            num_qubits: self.num_qubits,
            gates: self.gates,
        })
    }
}
