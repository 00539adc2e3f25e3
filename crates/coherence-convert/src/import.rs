//! Import of external vocabulary source back into a circuit.

use coherence_ir::{Circuit, Gate, GateKind, GateRegistry, IrError, QubitId};
use tracing::{debug, instrument};

use crate::error::{ConvertError, ConvertResult};
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::vocabulary::{AngleUnit, CallStyle, Vocabulary};

/// Read source written in `vocabulary` back into a circuit.
///
/// QASM-style vocabularies go through the QASM reader with `registry`; the
/// Python styles are tokenized and scanned for the gate-call shapes their
/// emitters write. Parameters are converted back to radians.
#[instrument(skip(text, vocabulary, registry), fields(vocabulary = vocabulary.name()))]
pub fn parse_external(
    text: &str,
    vocabulary: &Vocabulary,
    registry: &GateRegistry,
) -> ConvertResult<Circuit> {
    let circuit = match vocabulary.style() {
        CallStyle::Qasm => import_qasm(text, vocabulary, registry)?,
        style => Importer::new(tokenize(text)?, vocabulary, style).run()?,
    };
    debug!(
        num_qubits = circuit.num_qubits(),
        gates = circuit.num_gates(),
        "imported circuit"
    );
    Ok(circuit)
}

fn import_qasm(
    text: &str,
    vocabulary: &Vocabulary,
    registry: &GateRegistry,
) -> ConvertResult<Circuit> {
    let circuit = coherence_qasm::parse_with(text, registry)?;
    if let Some(gate) = circuit
        .gates()
        .iter()
        .find(|g| vocabulary.token_for(g.kind()).is_none())
    {
        return Err(ConvertError::UnsupportedGate {
            gate: gate.name().to_string(),
            vocabulary: vocabulary.name().to_string(),
        });
    }
    if vocabulary.angle_unit() == AngleUnit::Radians {
        return Ok(circuit);
    }

    let unit = vocabulary.angle_unit();
    let gates = circuit
        .gates()
        .iter()
        .map(|g| {
            let params = g.params().iter().map(|&p| unit.to_radians(p)).collect();
            Gate::new(g.kind().clone(), g.qubits().to_vec(), params)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ConvertError::Gate { line: 0, source })?;
    Circuit::new(circuit.num_qubits(), gates).map_err(|source| ConvertError::Gate { line: 0, source })
}

/// A numeric call argument.
#[derive(Debug, Clone, Copy)]
enum Arg {
    Index(u64),
    Real(f64),
}

impl Arg {
    fn value(self) -> f64 {
        match self {
            Arg::Index(i) => i as f64,
            Arg::Real(v) => v,
        }
    }
}

struct Call {
    line: usize,
    gate: Gate,
}

/// Single forward scan over the token stream.
struct Importer<'v> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    vocabulary: &'v Vocabulary,
    style: CallStyle,
    declared: Option<(u32, usize)>,
    calls: Vec<Call>,
}

impl<'v> Importer<'v> {
    fn new(tokens: Vec<SpannedToken>, vocabulary: &'v Vocabulary, style: CallStyle) -> Self {
        Self {
            tokens,
            pos: 0,
            vocabulary,
            style,
            declared: None,
            calls: Vec::new(),
        }
    }

    fn run(mut self) -> ConvertResult<Circuit> {
        while self.pos < self.tokens.len() {
            self.step()?;
        }
        self.finish()
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    fn is_ident_at(&self, offset: usize, name: &str) -> bool {
        matches!(self.peek_at(offset), Some(Token::Identifier(s)) if s == name)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|t| t.token.clone());
        self.pos += 1;
        token
    }

    fn syntax(&self, message: impl Into<String>) -> ConvertError {
        ConvertError::Syntax {
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: &Token) -> ConvertResult<()> {
        match self.peek_at(0) {
            Some(token) if token == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(self.syntax(format!("expected '{expected}', found '{token}'"))),
            None => Err(self.syntax(format!("expected '{expected}', found end of input"))),
        }
    }

    fn expect_identifier(&mut self) -> ConvertResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(token) => {
                self.pos -= 1;
                Err(self.syntax(format!("expected identifier, found '{token}'")))
            }
            None => Err(self.syntax("expected identifier, found end of input")),
        }
    }

    fn step(&mut self) -> ConvertResult<()> {
        if let Some(Token::Comment(text)) = self.peek_at(0) {
            let count = qubit_count_comment(text);
            let line = self.line();
            if let (None, Some(n)) = (self.declared, count) {
                self.declared = Some((n, line));
            }
            self.pos += 1;
            return Ok(());
        }

        let style = self.style;
        match style {
            CallStyle::Cirq if self.is_ident_at(0, "cirq") && self.is_ident_at(2, "LineQubit") => {
                self.parse_line_qubit_range()
            }
            CallStyle::Cirq if self.is_ident_at(0, "circuit") && self.is_ident_at(2, "append") => {
                self.parse_cirq_call()
            }
            CallStyle::Braket
                if self.is_ident_at(0, "circuit")
                    && self.peek_at(1) == Some(&Token::Dot)
                    && self.peek_at(3) == Some(&Token::LParen) =>
            {
                self.parse_braket_call()
            }
            CallStyle::Pyquil
                if self.is_ident_at(0, "program") && self.peek_at(1) == Some(&Token::PlusEq) =>
            {
                self.parse_pyquil_call()
            }
            _ => {
                self.pos += 1;
                Ok(())
            }
        }
    }

    /// `cirq.LineQubit.range(N)`
    fn parse_line_qubit_range(&mut self) -> ConvertResult<()> {
        let line = self.line();
        self.pos += 3;
        self.expect(&Token::Dot)?;
        let method = self.expect_identifier()?;
        if method != "range" {
            return Err(self.syntax(format!("expected 'range', found '{method}'")));
        }
        self.expect(&Token::LParen)?;
        let n = self.parse_count()?;
        self.expect(&Token::RParen)?;
        if self.declared.is_none() {
            self.declared = Some((n, line));
        }
        Ok(())
    }

    /// `circuit.append(cirq.TOKEN[(params)](qubits[i], ...))`
    fn parse_cirq_call(&mut self) -> ConvertResult<()> {
        let line = self.line();
        self.pos += 3;
        self.expect(&Token::LParen)?;
        let module = self.expect_identifier()?;
        if module != "cirq" {
            return Err(self.syntax(format!("expected 'cirq', found '{module}'")));
        }
        self.expect(&Token::Dot)?;
        let kind = self.resolve_token(line)?;

        self.expect(&Token::LParen)?;
        let params = if self.is_ident_at(0, "qubits") {
            Vec::new()
        } else {
            let args = self.parse_args()?;
            self.expect(&Token::LParen)?;
            args.into_iter().map(Arg::value).collect()
        };

        let mut qubits = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            if name != "qubits" {
                return Err(self.syntax(format!("expected 'qubits', found '{name}'")));
            }
            self.expect(&Token::LBracket)?;
            qubits.push(QubitId(self.parse_count()?));
            self.expect(&Token::RBracket)?;
            if self.peek_at(0) == Some(&Token::Comma) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        self.expect(&Token::RParen)?;
        self.push(line, kind, qubits, params)
    }

    /// `circuit.TOKEN(qubits..., params...)`
    fn parse_braket_call(&mut self) -> ConvertResult<()> {
        let line = self.line();
        self.pos += 2;
        let kind = self.resolve_token(line)?;
        self.expect(&Token::LParen)?;
        let args = self.parse_args()?;
        let split = args.len().saturating_sub(kind.num_params());
        let qubits = self.qubit_args(&args[..split])?;
        let params = args[split..].iter().map(|a| a.value()).collect();
        self.push(line, kind, qubits, params)
    }

    /// `program += TOKEN(params..., qubits...)`
    fn parse_pyquil_call(&mut self) -> ConvertResult<()> {
        let line = self.line();
        self.pos += 2;
        let kind = self.resolve_token(line)?;
        self.expect(&Token::LParen)?;
        let args = self.parse_args()?;
        let split = kind.num_params().min(args.len());
        let params = args[..split].iter().map(|a| a.value()).collect();
        let qubits = self.qubit_args(&args[split..])?;
        self.push(line, kind, qubits, params)
    }

    fn resolve_token(&mut self, line: usize) -> ConvertResult<GateKind> {
        let token = self.expect_identifier()?;
        self.vocabulary
            .kind_for(&token)
            .cloned()
            .ok_or_else(|| ConvertError::UnknownToken {
                line,
                token,
                vocabulary: self.vocabulary.name().to_string(),
            })
    }

    /// Comma-separated numeric arguments up to and including the closing `)`.
    fn parse_args(&mut self) -> ConvertResult<Vec<Arg>> {
        let mut args = Vec::new();
        if self.peek_at(0) == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_arg()?);
            match self.advance() {
                Some(Token::Comma) => {}
                Some(Token::RParen) => return Ok(args),
                Some(token) => {
                    self.pos -= 1;
                    return Err(self.syntax(format!("expected ',' or ')', found '{token}'")));
                }
                None => return Err(self.syntax("expected ')', found end of input")),
            }
        }
    }

    fn parse_arg(&mut self) -> ConvertResult<Arg> {
        let negative = self.peek_at(0) == Some(&Token::Minus);
        if negative {
            self.pos += 1;
        }
        let arg = match self.advance() {
            Some(Token::Int(i)) => Arg::Index(i),
            Some(Token::Float(v)) => Arg::Real(v),
            Some(token) => {
                self.pos -= 1;
                return Err(self.syntax(format!("expected number, found '{token}'")));
            }
            None => return Err(self.syntax("expected number, found end of input")),
        };
        Ok(match (negative, arg) {
            (false, arg) => arg,
            (true, arg) => Arg::Real(-arg.value()),
        })
    }

    fn parse_count(&mut self) -> ConvertResult<u32> {
        match self.advance() {
            Some(Token::Int(i)) => {
                u32::try_from(i).map_err(|_| self.syntax(format!("integer {i} is too large")))
            }
            Some(token) => {
                self.pos -= 1;
                Err(self.syntax(format!("expected integer, found '{token}'")))
            }
            None => Err(self.syntax("expected integer, found end of input")),
        }
    }

    fn qubit_args(&self, args: &[Arg]) -> ConvertResult<Vec<QubitId>> {
        args.iter()
            .map(|arg| match *arg {
                Arg::Index(i) => u32::try_from(i)
                    .map(QubitId)
                    .map_err(|_| self.syntax(format!("qubit index {i} is too large"))),
                Arg::Real(v) => Err(self.syntax(format!("expected qubit index, found '{v:?}'"))),
            })
            .collect()
    }

    fn push(
        &mut self,
        line: usize,
        kind: GateKind,
        qubits: Vec<QubitId>,
        params: Vec<f64>,
    ) -> ConvertResult<()> {
        let unit = self.vocabulary.angle_unit();
        let params = params.into_iter().map(|p| unit.to_radians(p)).collect();
        let gate =
            Gate::new(kind, qubits, params).map_err(|source| ConvertError::Gate { line, source })?;
        self.calls.push(Call { line, gate });
        Ok(())
    }

    fn finish(self) -> ConvertResult<Circuit> {
        let (num_qubits, header_line) = match self.declared {
            Some(declared) => declared,
            None => {
                let max = self
                    .calls
                    .iter()
                    .flat_map(|c| c.gate.qubits())
                    .map(|q| q.0)
                    .max()
                    .ok_or_else(|| ConvertError::Syntax {
                        line: 1,
                        message: "qubit count is not declared and no gates were found".into(),
                    })?;
                (max + 1, 1)
            }
        };

        for (gate_index, call) in self.calls.iter().enumerate() {
            if let Some(&qubit) = call.gate.qubits().iter().find(|q| q.0 >= num_qubits) {
                return Err(ConvertError::Gate {
                    line: call.line,
                    source: IrError::QubitOutOfRange {
                        qubit,
                        num_qubits,
                        gate: call.gate.name().to_string(),
                        gate_index,
                    },
                });
            }
        }

        let gates = self.calls.into_iter().map(|c| c.gate).collect();
        Circuit::new(num_qubits, gates).map_err(|source| ConvertError::Gate {
            line: header_line,
            source,
        })
    }
}

/// `qubits: N` from a `# qubits: N` comment.
fn qubit_count_comment(text: &str) -> Option<u32> {
    text.strip_prefix("qubits:")?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_vocabulary;
    use coherence_ir::{ErrorKind, StandardGate};

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

    fn roundtrip(vocabulary: &Vocabulary, circuit: &Circuit) -> Circuit {
        let text = to_vocabulary(circuit, vocabulary).unwrap();
        parse_external(&text, vocabulary, &GateRegistry::standard()).unwrap()
    }

    #[test]
    fn test_python_styles_roundtrip_exactly() {
        let circuit = example();
        for vocabulary in [Vocabulary::cirq(), Vocabulary::braket(), Vocabulary::pyquil()] {
            assert_eq!(roundtrip(&vocabulary, &circuit), circuit, "{}", vocabulary.name());
        }
    }

    #[test]
    fn test_qiskit_roundtrip() {
        let circuit = Circuit::qft(3).unwrap();
        assert!(roundtrip(&Vocabulary::qiskit(), &circuit).approx_eq(&circuit, 1e-9));
    }

    #[test]
    fn test_degrees_roundtrip() {
        let vocabulary = Vocabulary::braket().with_angle_unit(AngleUnit::Degrees);
        let circuit = example();
        assert!(roundtrip(&vocabulary, &circuit).approx_eq(&circuit, 1e-9));
    }

    #[test]
    fn test_negative_and_multi_param() {
        let mut builder = Circuit::builder(2);
        builder
            .cp(-0.25, QubitId(1), QubitId(0))
            .unwrap()
            .rx(-3.0, QubitId(1))
            .unwrap();
        let circuit = builder.build().unwrap();
        assert_eq!(roundtrip(&Vocabulary::braket(), &circuit), circuit);
        assert_eq!(roundtrip(&Vocabulary::pyquil(), &circuit), circuit);
    }

    #[test]
    fn test_unused_qubits_survive() {
        let mut builder = Circuit::builder(5);
        builder.h(QubitId(0)).unwrap();
        let circuit = builder.build().unwrap();
        assert_eq!(roundtrip(&Vocabulary::pyquil(), &circuit).num_qubits(), 5);
        assert_eq!(roundtrip(&Vocabulary::cirq(), &circuit).num_qubits(), 5);
    }

    #[test]
    fn test_count_falls_back_to_highest_index() {
        let text = "from pyquil import Program\nprogram = Program()\nprogram += CNOT(0, 3)\n";
        let circuit =
            parse_external(text, &Vocabulary::pyquil(), &GateRegistry::standard()).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.gates()[0].kind(), &GateKind::from(StandardGate::CX));
    }

    #[test]
    fn test_unknown_token() {
        let text = "import cirq\nqubits = cirq.LineQubit.range(1)\ncircuit.append(cirq.FOO(qubits[0]))\n";
        let err = parse_external(text, &Vocabulary::cirq(), &GateRegistry::standard()).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnknownToken {
                line: 3,
                token: "FOO".into(),
                vocabulary: "cirq".into(),
            }
        );
        assert_eq!(err.kind(), ErrorKind::UnknownGateKind);
    }

    #[test]
    fn test_malformed_call() {
        let text = "from braket.circuits import Circuit\ncircuit = Circuit()\ncircuit.h(0\ncircuit.x(1)\n";
        let err = parse_external(text, &Vocabulary::braket(), &GateRegistry::standard()).unwrap_err();
        assert!(matches!(err, ConvertError::Syntax { line: 4, .. }), "{err:?}");
    }

    #[test]
    fn test_symbolic_parameter_rejected() {
        let text = "from pyquil import Program\n# qubits: 1\nprogram += RZ(pi, 0)\n";
        let err = parse_external(text, &Vocabulary::pyquil(), &GateRegistry::standard()).unwrap_err();
        assert!(matches!(err, ConvertError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_arity_error_carries_line() {
        let text = "from braket.circuits import Circuit\n# qubits: 2\ncircuit.cnot(0)\n";
        let err = parse_external(text, &Vocabulary::braket(), &GateRegistry::standard()).unwrap_err();
        assert!(matches!(err, ConvertError::Gate { line: 3, .. }));
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_out_of_range() {
        let text = "import cirq\nqubits = cirq.LineQubit.range(2)\ncircuit.append(cirq.H(qubits[2]))\n";
        let err = parse_external(text, &Vocabulary::cirq(), &GateRegistry::standard()).unwrap_err();
        assert!(matches!(err, ConvertError::Gate { line: 3, .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_qasm_style_rejects_unmapped_kind() {
        let vocabulary = Vocabulary::new("clifford", CallStyle::Qasm).with_gate(StandardGate::H, "h");
        let text = "OPENQASM 2.0;\nqreg q[1];\nh q[0];\nrz(0.5) q[0];\n";
        let err = parse_external(text, &vocabulary, &GateRegistry::standard()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedGate { ref gate, .. } if gate == "rz"));
    }
}
