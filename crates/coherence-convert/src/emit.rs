//! Emission of a circuit in an external vocabulary.

use std::collections::BTreeSet;

use coherence_ir::{Circuit, Gate};
use coherence_qasm::{REGISTER, format_params};
use tracing::{debug, instrument};

use crate::error::{ConvertError, ConvertResult};
use crate::vocabulary::{CallStyle, Vocabulary};

/// Render `circuit` in `vocabulary`.
///
/// Every gate kind is looked up in the vocabulary's table before anything is
/// written, so an unsupported kind fails without producing partial output.
#[instrument(skip(circuit, vocabulary), fields(vocabulary = vocabulary.name()))]
pub fn to_vocabulary(circuit: &Circuit, vocabulary: &Vocabulary) -> ConvertResult<String> {
    let calls = circuit
        .gates()
        .iter()
        .map(|gate| lookup(gate, vocabulary).map(|token| (token, gate)))
        .collect::<ConvertResult<Vec<_>>>()?;

    let mut emitter = Emitter::new(vocabulary);
    match vocabulary.style() {
        CallStyle::Qasm => emitter.emit_qasm(circuit.num_qubits(), &calls),
        CallStyle::Cirq => emitter.emit_cirq(circuit.num_qubits(), &calls),
        CallStyle::Braket => emitter.emit_braket(circuit.num_qubits(), &calls),
        CallStyle::Pyquil => emitter.emit_pyquil(circuit.num_qubits(), &calls),
    }
    debug!(gates = calls.len(), bytes = emitter.output.len(), "emitted circuit");
    Ok(emitter.output)
}

fn lookup<'v>(gate: &Gate, vocabulary: &'v Vocabulary) -> ConvertResult<&'v str> {
    vocabulary
        .token_for(gate.kind())
        .ok_or_else(|| ConvertError::UnsupportedGate {
            gate: gate.name().to_string(),
            vocabulary: vocabulary.name().to_string(),
        })
}

struct Emitter<'v> {
    vocabulary: &'v Vocabulary,
    output: String,
}

impl<'v> Emitter<'v> {
    fn new(vocabulary: &'v Vocabulary) -> Self {
        Self {
            vocabulary,
            output: String::new(),
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Parameters in the vocabulary's angle unit, shortest round-trip form.
    fn params(&self, gate: &Gate) -> Vec<String> {
        gate.params()
            .iter()
            .map(|&p| format!("{:?}", self.vocabulary.angle_unit().from_radians(p)))
            .collect()
    }

    fn emit_qasm(&mut self, num_qubits: u32, calls: &[(&str, &Gate)]) {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln(&format!("qreg {REGISTER}[{num_qubits}];"));
        for (token, gate) in calls {
            let qubits = gate
                .qubits()
                .iter()
                .map(|q| format!("{REGISTER}[{}]", q.0))
                .collect::<Vec<_>>()
                .join(",");
            let params: Vec<f64> = gate
                .params()
                .iter()
                .map(|&p| self.vocabulary.angle_unit().from_radians(p))
                .collect();
            if params.is_empty() {
                self.writeln(&format!("{token} {qubits};"));
            } else {
                self.writeln(&format!("{token}({}) {qubits};", format_params(&params)));
            }
        }
    }

    fn emit_cirq(&mut self, num_qubits: u32, calls: &[(&str, &Gate)]) {
        self.writeln("import cirq");
        self.writeln("import numpy as np");
        self.writeln("");
        self.writeln("def create_circuit():");
        self.writeln(&format!("    qubits = cirq.LineQubit.range({num_qubits})"));
        self.writeln("    circuit = cirq.Circuit()");
        self.writeln("");
        for (token, gate) in calls {
            let qubits = gate
                .qubits()
                .iter()
                .map(|q| format!("qubits[{}]", q.0))
                .collect::<Vec<_>>()
                .join(", ");
            let params = self.params(gate);
            let op = if params.is_empty() {
                format!("cirq.{token}({qubits})")
            } else {
                format!("cirq.{token}({})({qubits})", params.join(", "))
            };
            self.writeln(&format!("    circuit.append({op})"));
        }
        self.writeln("    return circuit");
        self.footer("circuit");
    }

    fn emit_braket(&mut self, num_qubits: u32, calls: &[(&str, &Gate)]) {
        self.writeln("import braket.circuits as circuits");
        self.writeln("from braket.circuits import Circuit");
        self.writeln("");
        self.writeln("def create_circuit():");
        self.writeln(&format!("    # qubits: {num_qubits}"));
        self.writeln("    circuit = Circuit()");
        self.writeln("");
        for (token, gate) in calls {
            let args: Vec<String> = gate
                .qubits()
                .iter()
                .map(|q| q.0.to_string())
                .chain(self.params(gate))
                .collect();
            self.writeln(&format!("    circuit.{token}({})", args.join(", ")));
        }
        self.writeln("    return circuit");
        self.footer("circuit");
    }

    fn emit_pyquil(&mut self, num_qubits: u32, calls: &[(&str, &Gate)]) {
        let used: BTreeSet<&str> = calls.iter().map(|(token, _)| *token).collect();
        self.writeln("from pyquil import Program");
        if !used.is_empty() {
            let names: Vec<&str> = used.into_iter().collect();
            self.writeln(&format!("from pyquil.gates import {}", names.join(", ")));
        }
        self.writeln("");
        self.writeln("def create_circuit():");
        self.writeln(&format!("    # qubits: {num_qubits}"));
        self.writeln("    program = Program()");
        self.writeln("");
        for (token, gate) in calls {
            let args: Vec<String> = self
                .params(gate)
                .into_iter()
                .chain(gate.qubits().iter().map(|q| q.0.to_string()))
                .collect();
            self.writeln(&format!("    program += {token}({})", args.join(", ")));
        }
        self.writeln("    return program");
        self.footer("program");
    }

    fn footer(&mut self, binding: &str) {
        self.writeln("");
        self.writeln("# Usage:");
        self.writeln(&format!("# {binding} = create_circuit()"));
        self.writeln(&format!("# print({binding})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{AngleUnit, CallStyle};
    use coherence_ir::{QubitId, StandardGate};

    fn example() -> Circuit {
        let mut builder = Circuit::builder(3);
        builder
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .rz(1.5708, QubitId(2))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_cirq_lines() {
        let out = to_vocabulary(&example(), &Vocabulary::cirq()).unwrap();
        assert!(out.starts_with("import cirq\n"));
        assert!(out.contains("    qubits = cirq.LineQubit.range(3)\n"));
        assert!(out.contains("    circuit.append(cirq.H(qubits[0]))\n"));
        assert!(out.contains("    circuit.append(cirq.CNOT(qubits[0], qubits[1]))\n"));
        assert!(out.contains("    circuit.append(cirq.rz(1.5708)(qubits[2]))\n"));
        assert!(out.contains("    return circuit\n"));
    }

    #[test]
    fn test_braket_lines() {
        let out = to_vocabulary(&example(), &Vocabulary::braket()).unwrap();
        assert!(out.contains("from braket.circuits import Circuit\n"));
        assert!(out.contains("    circuit.h(0)\n"));
        assert!(out.contains("    circuit.cnot(0, 1)\n"));
        assert!(out.contains("    circuit.rz(2, 1.5708)\n"));
    }

    #[test]
    fn test_pyquil_lines() {
        let out = to_vocabulary(&example(), &Vocabulary::pyquil()).unwrap();
        assert!(out.contains("from pyquil.gates import CNOT, H, RZ\n"));
        assert!(out.contains("    program += H(0)\n"));
        assert!(out.contains("    program += CNOT(0, 1)\n"));
        assert!(out.contains("    program += RZ(1.5708, 2)\n"));
    }

    #[test]
    fn test_qiskit_matches_qasm_emitter() {
        let circuit = example();
        let out = to_vocabulary(&circuit, &Vocabulary::qiskit()).unwrap();
        assert_eq!(out, coherence_qasm::emit(&circuit));
    }

    #[test]
    fn test_missing_rz_is_unsupported() {
        let vocabulary = Vocabulary::new("clifford", CallStyle::Qasm)
            .with_gate(StandardGate::H, "h")
            .with_gate(StandardGate::CX, "cx");
        let err = to_vocabulary(&example(), &vocabulary).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnsupportedGate {
                gate: "rz".into(),
                vocabulary: "clifford".into(),
            }
        );
        assert_eq!(err.kind(), coherence_ir::ErrorKind::UnsupportedGate);
    }

    #[test]
    fn test_cirq_has_no_u() {
        let mut builder = Circuit::builder(1);
        builder.u(0.1, 0.2, 0.3, QubitId(0)).unwrap();
        let err = to_vocabulary(&builder.build().unwrap(), &Vocabulary::cirq()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedGate { ref gate, .. } if gate == "u"));
    }

    #[test]
    fn test_degrees_on_emission() {
        let vocabulary = Vocabulary::pyquil().with_angle_unit(AngleUnit::Degrees);
        let mut builder = Circuit::builder(1);
        builder.rz(std::f64::consts::PI, QubitId(0)).unwrap();
        let out = to_vocabulary(&builder.build().unwrap(), &vocabulary).unwrap();
        assert!(out.contains("    program += RZ(180.0, 0)\n"));
    }
}
