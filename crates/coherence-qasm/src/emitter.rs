//! QASM2 emitter for serializing circuits.

use coherence_ir::{Circuit, Gate, QubitId};

/// Register name used for emitted programs.
pub const REGISTER: &str = "q";

/// Emit a circuit as QASM 2.0 source code.
///
/// The output is the header, one `qreg` declaration, then one line per gate
/// in program order. Parameters use fixed-point formatting with at least 10
/// decimals and at least 10 significant digits. Qubits are joined by `,`
/// without spaces:
///
/// ```text
/// OPENQASM 2.0;
/// include "qelib1.inc";
/// qreg q[3];
/// rz(1.5708000000) q[2];
/// ```
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit);
    emitter.output
}

/// Render parameters the way the emitter does, joined by `,`.
pub fn format_params(params: &[f64]) -> String {
    params
        .iter()
        .map(|&p| format_param(p))
        .collect::<Vec<_>>()
        .join(",")
}

/// Fixed-point with 10 decimals, widened for magnitudes below 1 so that ten
/// significant digits survive: `0.0012345679` becomes `0.001234567890`.
fn format_param(value: f64) -> String {
    let decimals = if value == 0.0 || !value.is_finite() {
        10
    } else {
        (9 - value.abs().log10().floor() as i32).max(10) as usize
    };
    format!("{value:.decimals$}")
}

/// QASM2 emitter.
struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln(&format!("qreg {REGISTER}[{}];", circuit.num_qubits()));

        for gate in circuit.gates() {
            self.emit_gate(gate);
        }
    }

    fn emit_gate(&mut self, gate: &Gate) {
        let name = gate.name();
        let qubits = emit_qubits(gate.qubits());

        if gate.params().is_empty() {
            self.writeln(&format!("{name} {qubits};"));
        } else {
            let params = format_params(gate.params());
            self.writeln(&format!("{name}({params}) {qubits};"));
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| format!("{REGISTER}[{}]", q.0))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use std::f64::consts::PI;

    #[test]
    fn test_emit_bell() {
        let circuit = Circuit::bell().unwrap();
        let qasm = emit(&circuit);

        assert!(qasm.starts_with("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\n"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0],q[1];"));
        assert!(qasm.contains("measure q[1];"));
    }

    #[test]
    fn test_emit_parameter_format() {
        let mut builder = Circuit::builder(3);
        builder.rz(1.5708, QubitId(2)).unwrap();
        builder.u(PI, 0.0, -0.25, QubitId(0)).unwrap();
        let qasm = emit(&builder.build().unwrap());

        assert!(qasm.contains("rz(1.5708000000) q[2];"));
        assert!(qasm.contains("u(3.1415926536,0.0000000000,-0.2500000000) q[0];"));
    }

    #[test]
    fn test_small_parameters_keep_significant_digits() {
        let mut builder = Circuit::builder(1);
        builder.rz(0.001_234_567_890_1, QubitId(0)).unwrap();
        builder.rz(-3e-12, QubitId(0)).unwrap();
        builder.rz(0.09, QubitId(0)).unwrap();
        let circuit = builder.build().unwrap();
        let qasm = emit(&circuit);

        assert!(qasm.contains("rz(0.001234567890) q[0];"), "{qasm}");
        assert!(qasm.contains("rz(0.09000000000) q[0];"), "{qasm}");

        let reparsed = parse(&qasm).unwrap();
        assert_eq!(reparsed.gates()[1].params(), &[-3e-12]);
        assert!(reparsed.approx_eq(&circuit, 1e-9));
    }

    #[test]
    fn test_large_parameters_keep_ten_decimals() {
        assert_eq!(
            format_params(&[1234.5, -1.0, 0.0]),
            "1234.5000000000,-1.0000000000,0.0000000000"
        );
    }

    #[test]
    fn test_emit_barrier() {
        let mut builder = Circuit::builder(3);
        builder.barrier_all().unwrap();
        let qasm = emit(&builder.build().unwrap());
        assert!(qasm.contains("barrier q[0],q[1],q[2];"));
    }

    #[test]
    fn test_roundtrip() {
        let circuit = Circuit::qft(5).unwrap();
        let reparsed = parse(&emit(&circuit)).unwrap();
        assert!(reparsed.approx_eq(&circuit, 1e-9));
    }

    #[test]
    fn test_emit_is_deterministic() {
        let circuit = Circuit::ghz(4).unwrap();
        assert_eq!(emit(&circuit), emit(&circuit));
    }
}
