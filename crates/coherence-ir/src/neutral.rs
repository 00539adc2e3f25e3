//! Neutral JSON form of a circuit.
//!
//! ```json
//! { "num_qubits": 2,
//!   "gates": [ {"name": "h",  "qubits": [0],    "params": []},
//!              {"name": "cx", "qubits": [0, 1], "params": []} ] }
//! ```
//!
//! Reading validates in a fixed order: document shape, then `num_qubits`,
//! then gate names, then operand counts, then qubit bounds. The first failure
//! is reported with a JSON-pointer path to the offending field.
//!
//! Writing always emits keys in the order shown above, with canonical
//! lowercase gate names and `-0.0` written as `0.0`, so the compact form is
//! stable enough to hash.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use crate::circuit::Circuit;
use crate::error::{IrError, JsonError, Operand};
use crate::gate::Gate;
use crate::qubit::QubitId;
use crate::registry::GateRegistry;

/// Result type for neutral JSON operations.
pub type JsonResult<T> = Result<T, JsonError>;

/// Parse a circuit from neutral JSON text.
pub fn from_str(text: &str, registry: &GateRegistry) -> JsonResult<Circuit> {
    let value: Value = serde_json::from_str(text)?;
    from_value(&value, registry)
}

/// Parse a circuit from neutral JSON bytes.
pub fn from_slice(bytes: &[u8], registry: &GateRegistry) -> JsonResult<Circuit> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(&value, registry)
}

/// Build a circuit from an already-decoded JSON value.
pub fn from_value(value: &Value, registry: &GateRegistry) -> JsonResult<Circuit> {
    let doc = read_shape(value)?;

    let num_qubits = match doc.num_qubits.as_u64() {
        Some(n) if n >= 1 && n <= u64::from(u32::MAX) => n as u32,
        _ => {
            return Err(JsonError::invalid(
                "/num_qubits",
                format!("expected a positive integer, found {}", doc.num_qubits),
            ));
        }
    };

    let mut kinds = Vec::with_capacity(doc.gates.len());
    for (i, gate) in doc.gates.iter().enumerate() {
        let kind = registry
            .get(gate.name)
            .ok_or_else(|| JsonError::UnknownGateKind {
                path: format!("/gates/{i}/name"),
                name: gate.name.to_string(),
            })?;
        kinds.push(kind);
    }

    for (i, (gate, kind)) in doc.gates.iter().zip(&kinds).enumerate() {
        kind.check_arity(gate.qubits.len(), gate.params.len())
            .map_err(|e| at_gate(e, i))?;
    }

    for (i, gate) in doc.gates.iter().enumerate() {
        if let Some(j) = gate.qubits.iter().position(|&q| q >= u64::from(num_qubits)) {
            return Err(JsonError::invalid(
                format!("/gates/{i}/qubits/{j}"),
                format!(
                    "qubit {} out of range for a {num_qubits}-qubit circuit",
                    gate.qubits[j]
                ),
            ));
        }
    }

    let mut gates = Vec::with_capacity(doc.gates.len());
    for (i, (raw, kind)) in doc.gates.into_iter().zip(kinds).enumerate() {
        // Bounds are checked above, so every index fits in u32.
        let qubits = raw.qubits.iter().map(|&q| QubitId(q as u32)).collect();
        let gate = Gate::new(kind.clone(), qubits, raw.params).map_err(|e| at_gate(e, i))?;
        gates.push(gate);
    }

    Circuit::new(num_qubits, gates).map_err(|e| JsonError::invalid("", e.to_string()))
}

/// Serialize a circuit to compact neutral JSON.
pub fn to_string(circuit: &Circuit) -> JsonResult<String> {
    serde_json::to_string(circuit).map_err(|e| JsonError::Encode(e.to_string()))
}

/// Serialize a circuit to indented neutral JSON.
pub fn to_string_pretty(circuit: &Circuit) -> JsonResult<String> {
    serde_json::to_string_pretty(circuit).map_err(|e| JsonError::Encode(e.to_string()))
}

/// Canonical bytes of a circuit, used for content addressing.
pub fn to_canonical_bytes(circuit: &Circuit) -> JsonResult<Vec<u8>> {
    serde_json::to_vec(circuit).map_err(|e| JsonError::Encode(e.to_string()))
}

struct RawDoc<'a> {
    num_qubits: &'a Value,
    gates: Vec<RawGate<'a>>,
}

struct RawGate<'a> {
    name: &'a str,
    qubits: Vec<u64>,
    params: Vec<f64>,
}

fn read_shape(value: &Value) -> JsonResult<RawDoc<'_>> {
    let root = value
        .as_object()
        .ok_or_else(|| JsonError::invalid("", "expected an object"))?;
    let num_qubits = root
        .get("num_qubits")
        .ok_or_else(|| JsonError::invalid("/num_qubits", "missing field"))?;
    let gates = root
        .get("gates")
        .ok_or_else(|| JsonError::invalid("/gates", "missing field"))?
        .as_array()
        .ok_or_else(|| JsonError::invalid("/gates", "expected an array"))?;

    let mut raw = Vec::with_capacity(gates.len());
    for (i, gate) in gates.iter().enumerate() {
        let path = format!("/gates/{i}");
        let obj = gate
            .as_object()
            .ok_or_else(|| JsonError::invalid(&path, "expected an object"))?;

        let name = obj
            .get("name")
            .ok_or_else(|| JsonError::invalid(format!("{path}/name"), "missing field"))?
            .as_str()
            .ok_or_else(|| JsonError::invalid(format!("{path}/name"), "expected a string"))?;

        let qubits = obj
            .get("qubits")
            .ok_or_else(|| JsonError::invalid(format!("{path}/qubits"), "missing field"))?
            .as_array()
            .ok_or_else(|| JsonError::invalid(format!("{path}/qubits"), "expected an array"))?
            .iter()
            .enumerate()
            .map(|(j, q)| {
                q.as_u64().ok_or_else(|| {
                    JsonError::invalid(
                        format!("{path}/qubits/{j}"),
                        "expected a non-negative integer",
                    )
                })
            })
            .collect::<JsonResult<Vec<_>>>()?;

        let params = match obj.get("params") {
            None => vec![],
            Some(p) => p
                .as_array()
                .ok_or_else(|| JsonError::invalid(format!("{path}/params"), "expected an array"))?
                .iter()
                .enumerate()
                .map(|(j, v)| {
                    v.as_f64().ok_or_else(|| {
                        JsonError::invalid(format!("{path}/params/{j}"), "expected a number")
                    })
                })
                .collect::<JsonResult<Vec<_>>>()?,
        };

        raw.push(RawGate {
            name,
            qubits,
            params,
        });
    }

    Ok(RawDoc {
        num_qubits,
        gates: raw,
    })
}

/// Attach a gate path to an IR error raised while checking gate `index`.
fn at_gate(err: IrError, index: usize) -> JsonError {
    match err {
        IrError::ArityMismatch {
            gate,
            operand,
            expected,
            got,
        } => JsonError::ArityMismatch {
            path: format!("/gates/{index}/{}", field_name(operand)),
            gate,
            operand,
            expected,
            got,
        },
        IrError::DuplicateQubit { .. } => {
            JsonError::invalid(format!("/gates/{index}/qubits"), err.to_string())
        }
        other => JsonError::invalid(format!("/gates/{index}"), other.to_string()),
    }
}

fn field_name(operand: Operand) -> &'static str {
    match operand {
        Operand::Qubits => "qubits",
        Operand::Params => "params",
    }
}

struct GateRef<'a>(&'a Gate);

impl Serialize for GateRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let gate = self.0;
        let qubits: Vec<u32> = gate.qubits().iter().map(|q| q.0).collect();
        // `p + 0.0` maps -0.0 to 0.0 and leaves every other value unchanged.
        let params: Vec<f64> = gate.params().iter().map(|p| p + 0.0).collect();

        let mut s = serializer.serialize_struct("Gate", 3)?;
        s.serialize_field("name", gate.name())?;
        s.serialize_field("qubits", &qubits)?;
        s.serialize_field("params", &params)?;
        s.end()
    }
}

impl Serialize for Circuit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let gates: Vec<GateRef<'_>> = self.gates().iter().map(GateRef).collect();
        let mut s = serializer.serialize_struct("Circuit", 2)?;
        s.serialize_field("num_qubits", &self.num_qubits())?;
        s.serialize_field("gates", &gates)?;
        s.end()
    }
}
