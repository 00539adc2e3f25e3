//! The metrics engine: depth, gate counts, fidelity, energy, E1 and QES.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use coherence_ir::{Arity, Circuit, GateKind, QubitId, StandardGate};

use crate::alert::Alert;
use crate::config::MetricsConfig;
use crate::error::ConfigResult;

/// Metrics computed for one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Register size.
    pub num_qubits: u32,
    /// Total gate count.
    pub num_gates: usize,
    /// Number of layers.
    pub depth: usize,
    /// Occurrences per canonical gate name.
    pub gate_counts: BTreeMap<String, usize>,
    /// Gates acting on exactly two qubits.
    #[serde(default)]
    pub two_qubit_gates: usize,
    /// Estimated success probability in `[0, 1]`.
    pub fidelity: f64,
    /// Estimated energy, `>= 0`.
    pub energy: f64,
    /// Energy efficiency, `fidelity / (energy + epsilon)`.
    pub e1: f64,
    /// Quantum Efficiency Score.
    pub qes: f64,
}

/// Stateless metrics calculator over a validated configuration.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Create an engine, validating `config`.
    pub fn new(config: MetricsConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Compute every metric for `circuit`.
    pub fn analyze(&self, circuit: &Circuit) -> MetricsResult {
        let num_qubits = circuit.num_qubits();
        let num_gates = circuit.num_gates();
        let depth = depth(circuit);
        let tally = tally(circuit);

        let mut fidelity = 1.0;
        let mut energy = f64::from(num_qubits) * self.config.energy.qubit_overhead;
        let mut gate_counts = BTreeMap::new();
        let mut two_qubit_gates = 0;
        for (kind, &count) in &tally {
            // Counts beyond i32 only push the product further toward 0.
            let exponent = i32::try_from(count).unwrap_or(i32::MAX);
            fidelity *= (1.0 - self.error_rate(kind)).powi(exponent);
            energy += count as f64 * self.energy_cost(kind);
            if kind.arity() == Arity::Exactly(2) {
                two_qubit_gates += count;
            }
            gate_counts.insert(kind.name().to_string(), count);
        }
        if let Some(t) = self.config.decoherence_time {
            fidelity *= (-(depth as f64) / t).exp();
        }
        let fidelity = fidelity.clamp(0.0, 1.0);

        let e1 = fidelity / (energy + self.config.epsilon);
        let qes = self.qes(fidelity, e1, depth, num_gates, num_qubits);

        MetricsResult {
            num_qubits,
            num_gates,
            depth,
            gate_counts,
            two_qubit_gates,
            fidelity,
            energy,
            e1,
            qes,
        }
    }

    /// Error probability of one application of `kind`.
    pub fn error_rate(&self, kind: &GateKind) -> f64 {
        let rates = &self.config.error_rates;
        if let Some(&rate) = rates.per_kind.get(kind.name()) {
            return rate;
        }
        match kind {
            GateKind::Standard(StandardGate::Barrier) => 0.0,
            GateKind::Standard(gate) => match gate.arity().min() {
                0 | 1 => rates.single_qubit,
                2 => rates.two_qubit,
                _ => rates.multi_qubit,
            },
            GateKind::Custom(_) => rates.default_error_rate,
        }
    }

    /// Energy cost of one application of `kind`.
    pub fn energy_cost(&self, kind: &GateKind) -> f64 {
        let energy = &self.config.energy;
        energy
            .per_kind
            .get(kind.name())
            .copied()
            .unwrap_or(energy.default_cost)
    }

    fn qes(&self, fidelity: f64, e1: f64, depth: usize, num_gates: usize, num_qubits: u32) -> f64 {
        let w = &self.config.weights;
        let normalized_depth = depth as f64 / num_gates.max(1) as f64;
        let gates_per_qubit = num_gates as f64 / f64::from(num_qubits.max(1));
        let normalized_size = gates_per_qubit / self.config.gate_count_scale;
        w.fidelity_weight * fidelity + w.efficiency_weight * e1
            - w.depth_penalty * normalized_depth
            - w.size_penalty * normalized_size
    }

    /// Advisory alerts for a computed result.
    ///
    /// Returns [`Alert::NoIssues`] alone when no threshold is crossed.
    pub fn alerts(&self, result: &MetricsResult) -> Vec<Alert> {
        let limits = &self.config.alerts;
        let mut alerts = Vec::new();
        if result.depth > limits.max_depth {
            alerts.push(Alert::HighDepth {
                depth: result.depth,
                limit: limits.max_depth,
            });
        }
        if result.fidelity < limits.min_fidelity {
            alerts.push(Alert::LowFidelity {
                fidelity: result.fidelity,
                limit: limits.min_fidelity,
            });
        }
        if result.qes < limits.min_qes {
            alerts.push(Alert::LowQes {
                qes: result.qes,
                limit: limits.min_qes,
            });
        }
        if result.two_qubit_gates > limits.max_two_qubit {
            alerts.push(Alert::ManyTwoQubitGates {
                count: result.two_qubit_gates,
                limit: limits.max_two_qubit,
            });
        }
        if alerts.is_empty() {
            alerts.push(Alert::NoIssues);
        }
        alerts
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            config: MetricsConfig::default(),
        }
    }
}

fn tally(circuit: &Circuit) -> FxHashMap<&GateKind, usize> {
    let mut counts: FxHashMap<&GateKind, usize> = FxHashMap::default();
    for gate in circuit.gates() {
        *counts.entry(gate.kind()).or_default() += 1;
    }
    counts
}

/// Occurrences of each gate kind, keyed by canonical name.
pub fn gate_counts(circuit: &Circuit) -> BTreeMap<String, usize> {
    tally(circuit)
        .into_iter()
        .map(|(kind, count)| (kind.name().to_string(), count))
        .collect()
}

/// Layer index of every gate, in program order.
///
/// A gate lands one layer above the highest layer already occupied on any
/// of its qubits, or in layer 0 if none is.
pub fn layers(circuit: &Circuit) -> Vec<usize> {
    // next[q] = first layer still free on qubit q; only touched qubits are kept
    let mut next: FxHashMap<QubitId, usize> = FxHashMap::default();
    circuit
        .gates()
        .iter()
        .map(|gate| {
            let layer = gate
                .qubits()
                .iter()
                .map(|q| next.get(q).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            for &q in gate.qubits() {
                next.insert(q, layer + 1);
            }
            layer
        })
        .collect()
}

/// Circuit depth: number of layers, 0 for an empty circuit.
pub fn depth(circuit: &Circuit) -> usize {
    layers(circuit).into_iter().max().map_or(0, |top| top + 1)
}
