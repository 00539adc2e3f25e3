//! Property-based tests for layering.

use coherence_ir::{Circuit, Gate, GateRegistry, QubitId};
use coherence_metrics::{MetricsEngine, depth, layers};
use proptest::prelude::*;

fn arb_gates(num_qubits: u32) -> impl Strategy<Value = Vec<Gate>> {
    let registry = GateRegistry::standard();
    let single = (0..num_qubits).prop_map(move |q| (vec![q], "h"));
    let pair = prop::sample::subsequence((0..num_qubits).collect::<Vec<_>>(), 2)
        .prop_shuffle()
        .prop_map(|qs| (qs, "cx"));
    prop::collection::vec(prop_oneof![3 => single, 2 => pair], 0..=30).prop_map(move |specs| {
        specs
            .into_iter()
            .map(|(qs, name)| {
                registry
                    .gate(name, qs.into_iter().map(QubitId).collect(), vec![])
                    .expect("generated gate is well-formed")
            })
            .collect()
    })
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=6).prop_flat_map(|n| {
        arb_gates(n).prop_map(move |gates| Circuit::new(n, gates).expect("operands are in range"))
    })
}

/// Move every gate that commutes past its predecessor (disjoint qubits) one step
/// earlier, where `swap_mask` says so. Per-qubit order is preserved.
fn reorder_disjoint(circuit: &Circuit, swap_mask: &[bool]) -> Circuit {
    let mut gates = circuit.gates().to_vec();
    for i in 1..gates.len() {
        if !swap_mask.get(i).copied().unwrap_or(false) {
            continue;
        }
        let disjoint = gates[i]
            .qubits()
            .iter()
            .all(|q| !gates[i - 1].qubits().contains(q));
        if disjoint {
            gates.swap(i - 1, i);
        }
    }
    Circuit::new(circuit.num_qubits(), gates).expect("same operands")
}

proptest! {
    /// Depth is unchanged by any reordering that keeps each qubit's gate order.
    #[test]
    fn test_depth_invariant_under_commuting_swaps(
        circuit in arb_circuit(),
        mask in prop::collection::vec(any::<bool>(), 30),
    ) {
        let reordered = reorder_disjoint(&circuit, &mask);
        prop_assert_eq!(depth(&reordered), depth(&circuit));
    }

    /// Depth never exceeds the gate count and is positive for non-empty circuits.
    #[test]
    fn test_depth_bounds(circuit in arb_circuit()) {
        let d = depth(&circuit);
        prop_assert!(d <= circuit.num_gates());
        prop_assert_eq!(d == 0, circuit.is_empty());
    }

    /// Each gate sits strictly above every earlier gate it shares a qubit with.
    #[test]
    fn test_layers_respect_dependencies(circuit in arb_circuit()) {
        let assigned = layers(&circuit);
        let gates = circuit.gates();
        for j in 0..gates.len() {
            for i in 0..j {
                if gates[i].qubits().iter().any(|q| gates[j].qubits().contains(q)) {
                    prop_assert!(assigned[i] < assigned[j]);
                }
            }
        }
    }

    /// Fidelity stays within [0, 1] and energy is non-negative.
    #[test]
    fn test_metric_ranges(circuit in arb_circuit()) {
        let metrics = MetricsEngine::default().analyze(&circuit);
        prop_assert!((0.0..=1.0).contains(&metrics.fidelity));
        prop_assert!(metrics.energy >= 0.0);
        prop_assert_eq!(metrics.gate_counts.values().sum::<usize>(), metrics.num_gates);
    }
}
