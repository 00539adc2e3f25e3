//! Parser for the `OpenQASM` 2 subset.
//!
//! One left-to-right pass over the token stream with no backtracking. Gate
//! statements are resolved and validated as they are read, so the first
//! error in program order is the one reported.

mod statement;

use coherence_ir::{Circuit, Gate, GateRegistry};

use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QASM2 source string against the built-in gate vocabulary.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    parse_with(source, &GateRegistry::standard())
}

/// Parse a QASM2 source string, resolving gate names through `registry`.
pub fn parse_with(source: &str, registry: &GateRegistry) -> ParseResult<Circuit> {
    let mut parser = Parser::new(source, registry)?;
    parser.parse_program()
}

/// The declared quantum register.
pub(super) struct Register {
    pub(super) name: String,
    pub(super) size: u32,
}

/// Parser state.
pub(super) struct Parser<'r> {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) registry: &'r GateRegistry,
    pub(super) register: Option<Register>,
    pub(super) gates: Vec<Gate>,
    /// 0-based index of the statement being parsed, header included.
    pub(super) statement: usize,
}

impl<'r> Parser<'r> {
    /// Create a new parser from source.
    fn new(source: &str, registry: &'r GateRegistry) -> ParseResult<Self> {
        let tokens = tokenize(source).map_err(|e| ParseError::LexerError {
            line: e.line,
            column: e.column,
            message: e.message,
        })?;

        Ok(Self {
            tokens,
            pos: 0,
            registry,
            register: None,
            gates: vec![],
            statement: 0,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Line of the current token, or of the last token at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Error for the current token not matching `expected`.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                line: self.line(),
                expected: expected.into(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof {
                line: self.line(),
                expected: expected.into(),
            },
        }
    }

    /// Expect a specific token.
    pub(super) fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.check(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{expected}'")))
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Circuit> {
        while !self.is_eof() {
            self.parse_statement()?;
            self.statement += 1;
        }

        let register = self.register.take().ok_or_else(|| ParseError::UndeclaredRegister {
            line: self.line(),
            name: "q".into(),
        })?;
        let gates = std::mem::take(&mut self.gates);

        // Every gate was bounds-checked as it was read.
        Circuit::new(register.size, gates).map_err(|source| ParseError::Gate {
            line: self.line(),
            statement: self.statement,
            source,
        })
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Identifier(s)) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse an integer literal.
    pub(super) fn parse_int_literal(&mut self) -> ParseResult<u64> {
        let value = match self.peek() {
            Some(Token::IntLiteral(digits)) => digits
                .parse::<u64>()
                .map_err(|_| self.unexpected("integer below 2^64"))?,
            _ => return Err(self.unexpected("integer")),
        };
        self.pos += 1;
        Ok(value)
    }

    /// Parse a real literal with an optional sign.
    ///
    /// Integer literals of any width are accepted as reals.
    pub(super) fn parse_real(&mut self) -> ParseResult<f64> {
        let negative = if self.consume(&Token::Minus) {
            true
        } else {
            self.consume(&Token::Plus);
            false
        };
        let value = match self.peek() {
            Some(&Token::FloatLiteral(v)) => v,
            Some(Token::IntLiteral(digits)) => digits
                .parse::<f64>()
                .map_err(|_| self.unexpected("real number"))?,
            _ => return Err(self.unexpected("real number")),
        };
        self.pos += 1;
        Ok(if negative { -value } else { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coherence_ir::{ErrorKind, QubitId};

    const EXAMPLE: &str = r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[3];
        h q[0];
        cx q[0],q[1];
        rz(1.5708) q[2];
    "#;

    #[test]
    fn test_parse_example() {
        let circuit = parse(EXAMPLE).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_gates(), 3);
        assert_eq!(circuit.gates()[1].qubits(), &[QubitId(0), QubitId(1)]);
        assert_eq!(circuit.gates()[2].params(), &[1.5708]);
    }

    #[test]
    fn test_parse_header_optional() {
        let circuit = parse("qreg q[1]; x q[0];").unwrap();
        assert_eq!(circuit.num_gates(), 1);
    }

    #[test]
    fn test_parse_signed_and_exponent_params() {
        let source = "qreg q[1]; u(-1e-3, +2, .5) q[0]; rx(3) q[0];";
        let circuit = parse(source).unwrap();
        assert_eq!(circuit.gates()[0].params(), &[-1e-3, 2.0, 0.5]);
        assert_eq!(circuit.gates()[1].params(), &[3.0]);
    }

    #[test]
    fn test_parse_barrier_and_measure() {
        let source = "qreg q[3]; barrier q[0],q[1],q[2]; measure q[1]; reset q[0];";
        let circuit = parse(source).unwrap();
        assert_eq!(circuit.gates()[0].qubits().len(), 3);
        assert_eq!(circuit.gates()[1].name(), "measure");
        assert_eq!(circuit.gates()[2].name(), "reset");
    }

    #[test]
    fn test_wide_integer_parameter() {
        let circuit = parse("qreg q[1]; rz(99999999999999999999) q[0]; rx(-7) q[0];").unwrap();
        assert_eq!(circuit.gates()[0].params(), &[1e20]);
        assert_eq!(circuit.gates()[1].params(), &[-7.0]);

        let err = parse("qreg q[99999999999999999999];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_aliases_resolve() {
        let circuit = parse("qreg q[2]; CNOT q[0],q[1];").unwrap();
        assert_eq!(circuit.gates()[0].name(), "cx");
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("OPENQASM 2.0;\nqreg q[2];\nh q[0]\ncx q[0],q[1];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.line(), 4);
        assert!(err.to_string().contains("cx"));
    }

    #[test]
    fn test_missing_semicolon_at_eof() {
        let err = parse("qreg q[2];\nh q[0]").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { line: 2, .. }));
    }

    #[test]
    fn test_unknown_gate() {
        let err = parse("OPENQASM 2.0;\nqreg q[1];\nfoo q[0];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownGateKind);
        assert!(matches!(err, ParseError::UnknownGate { statement: 2, line: 3, .. }));
    }

    #[test]
    fn test_gate_name_resolved_before_operands() {
        let err = parse("qreg q[1]; foo r[0];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownGateKind);
        assert!(matches!(err, ParseError::UnknownGate { statement: 1, ref name, .. } if name == "foo"));

        let err = parse("foo q[0]; qreg q[1];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownGateKind);

        let err = parse("qreg q[1]; h r[0];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_arity_mismatch_names_statement() {
        let err = parse("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\ncx q[0];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
        assert!(matches!(err, ParseError::Gate { statement: 3, .. }));
    }

    #[test]
    fn test_unsupported_constructs() {
        for source in [
            "qreg q[2]; creg c[2];",
            "qreg q[2]; qreg r[2];",
            "qreg q[1]; gate foo a { x a; }",
            "qreg q[1]; opaque bar a;",
            "qreg q[1]; measure q[0] -> c[0];",
            "qreg q[1]; if (c == 1) x q[0];",
        ] {
            let err = parse(source).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedConstruct, "{source}");
        }
    }

    #[test]
    fn test_register_validation() {
        let err = parse("h q[0]; qreg q[1];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = parse("qreg q[2]; h r[0];").unwrap_err();
        assert!(matches!(err, ParseError::UndeclaredRegister { .. }));

        let err = parse("qreg q[2]; h q[2];").unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfBounds { index: 2, size: 2, .. }));

        let err = parse("qreg q[0];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = parse("OPENQASM 2.0;").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_duplicate_qubit() {
        let err = parse("qreg q[2]; cx q[1],q[1];").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = GateRegistry::standard();
        registry
            .register(coherence_ir::CustomGate::new("iswap", 2))
            .unwrap();
        let circuit = parse_with("qreg q[2]; iswap q[0],q[1];", &registry).unwrap();
        assert_eq!(circuit.gates()[0].name(), "iswap");
        assert!(parse("qreg q[2]; iswap q[0],q[1];").is_err());
    }
}
