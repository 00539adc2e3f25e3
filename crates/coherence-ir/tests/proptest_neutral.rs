//! Property-based tests for the neutral JSON form.

use coherence_ir::{Circuit, GateRegistry, QubitId, StandardGate, neutral};
use proptest::prelude::*;

/// Random circuits over every built-in kind, with arbitrary finite parameters.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (3_u32..=6).prop_flat_map(|num_qubits| {
        let gate = (
            0..StandardGate::ALL.len(),
            Just(num_qubits),
            prop::collection::vec(-1.0e6_f64..1.0e6, 3),
            prop::sample::subsequence((0..num_qubits).collect::<Vec<_>>(), 1..=3),
        );
        (Just(num_qubits), prop::collection::vec(gate, 0..=16)).prop_map(|(nq, specs)| {
            let mut builder = Circuit::builder(nq);
            for (kind_index, _, params, qubits) in specs {
                let kind = StandardGate::ALL[kind_index];
                if !kind.arity().accepts(qubits.len()) {
                    continue;
                }
                let qubits = qubits.into_iter().map(QubitId).collect();
                let params = params[..kind.num_params()].to_vec();
                builder
                    .gate(kind, qubits, params)
                    .expect("generated gate is well-formed");
            }
            builder.build().expect("qubit count is positive")
        })
    })
}

proptest! {
    /// parse(serialize(c)) == c, exactly.
    #[test]
    fn test_neutral_roundtrip_is_exact(circuit in arb_circuit()) {
        let registry = GateRegistry::standard();
        let text = neutral::to_string(&circuit).unwrap();
        let parsed = neutral::from_str(&text, &registry).unwrap();
        prop_assert_eq!(parsed, circuit);
    }

    /// Compact and pretty output describe the same circuit and canonicalize identically.
    #[test]
    fn test_pretty_and_compact_agree(circuit in arb_circuit()) {
        let registry = GateRegistry::standard();
        let pretty = neutral::to_string_pretty(&circuit).unwrap();
        let parsed = neutral::from_str(&pretty, &registry).unwrap();
        prop_assert_eq!(
            neutral::to_canonical_bytes(&parsed).unwrap(),
            neutral::to_canonical_bytes(&circuit).unwrap()
        );
    }
}
