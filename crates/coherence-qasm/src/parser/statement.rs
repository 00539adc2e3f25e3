//! Statement parsing for QASM2.

use coherence_ir::{Gate, QubitId};

use super::{Parser, Register};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

/// A `reg[index]` operand as written.
struct QubitRef {
    register: String,
    index: u64,
}

impl Parser<'_> {
    /// Parse one statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<()> {
        let line = self.line();
        let token = self.peek().cloned().ok_or_else(|| self.unexpected("statement"))?;

        match token {
            Token::OpenQasm => self.parse_version(),
            Token::Include => self.parse_include(),
            Token::Qreg => self.parse_qreg(),
            Token::Creg => Err(unsupported(line, "classical registers (creg)")),
            Token::Gate => Err(unsupported(line, "gate definitions")),
            Token::Opaque => Err(unsupported(line, "opaque gate declarations")),
            Token::If => Err(unsupported(line, "classically controlled operations (if)")),
            Token::Identifier(_) => self.parse_gate_statement(),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// `OPENQASM <version>;`
    fn parse_version(&mut self) -> ParseResult<()> {
        self.expect(&Token::OpenQasm)?;
        match self.peek() {
            Some(Token::FloatLiteral(_) | Token::IntLiteral(_)) => self.pos += 1,
            _ => return Err(self.unexpected("version number")),
        }
        self.expect(&Token::Semicolon)
    }

    /// `include "<file>";`
    fn parse_include(&mut self) -> ParseResult<()> {
        self.expect(&Token::Include)?;
        match self.peek() {
            Some(Token::StringLiteral(_)) => self.pos += 1,
            _ => return Err(self.unexpected("string literal")),
        }
        self.expect(&Token::Semicolon)
    }

    /// `qreg <name>[<size>];`
    fn parse_qreg(&mut self) -> ParseResult<()> {
        let line = self.line();
        self.expect(&Token::Qreg)?;
        let name = self.parse_identifier()?;
        self.expect(&Token::LBracket)?;
        let size = self.parse_int_literal()?;
        self.expect(&Token::RBracket)?;
        self.expect(&Token::Semicolon)?;

        if self.register.is_some() {
            return Err(unsupported(line, "multiple quantum registers"));
        }
        let size = match u32::try_from(size) {
            Ok(0) => return Err(ParseError::EmptyRegister { line, name }),
            Ok(n) => n,
            Err(_) => {
                return Err(ParseError::IndexOutOfBounds {
                    line,
                    register: name,
                    index: size,
                    size: u32::MAX,
                });
            }
        };
        self.register = Some(Register { name, size });
        Ok(())
    }

    /// `<name>[(<params>)] <qubit>[,<qubit>...];`
    fn parse_gate_statement(&mut self) -> ParseResult<()> {
        let line = self.line();
        let name = self.parse_identifier()?;

        let mut params = vec![];
        if self.consume(&Token::LParen) {
            if !self.check(&Token::RParen) {
                params.push(self.parse_real()?);
                while self.consume(&Token::Comma) {
                    params.push(self.parse_real()?);
                }
            }
            self.expect(&Token::RParen)?;
        }

        let mut operands = vec![self.parse_qubit_ref()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_qubit_ref()?);
        }

        if self.check(&Token::Arrow) {
            return Err(unsupported(line, "measurement into classical bits (->)"));
        }
        self.expect(&Token::Semicolon)?;

        let kind = self
            .registry
            .get(&name)
            .ok_or_else(|| ParseError::UnknownGate {
                line,
                statement: self.statement,
                name: name.clone(),
            })?
            .clone();
        let qubits = self.resolve_operands(line, operands)?;

        // Arity is checked before bounds, matching the JSON reader.
        kind.check_arity(qubits.len(), params.len())
            .map_err(|source| ParseError::Gate {
                line,
                statement: self.statement,
                source,
            })?;
        let qubits = self.check_bounds(line, qubits)?;

        let gate = Gate::new(kind, qubits, params).map_err(|source| {
            ParseError::Gate {
                line,
                statement: self.statement,
                source,
            }
        })?;
        self.gates.push(gate);
        Ok(())
    }

    /// `<reg>[<index>]`
    fn parse_qubit_ref(&mut self) -> ParseResult<QubitRef> {
        let register = self.parse_identifier()?;
        self.expect(&Token::LBracket)?;
        let index = self.parse_int_literal()?;
        self.expect(&Token::RBracket)?;
        Ok(QubitRef { register, index })
    }

    /// Check operands name the declared register; yields raw indices.
    fn resolve_operands(&self, line: usize, operands: Vec<QubitRef>) -> ParseResult<Vec<u64>> {
        let Some(register) = &self.register else {
            let name = operands
                .into_iter()
                .next()
                .map(|op| op.register)
                .unwrap_or_default();
            return Err(ParseError::UndeclaredRegister { line, name });
        };

        operands
            .into_iter()
            .map(|op| {
                if op.register == register.name {
                    Ok(op.index)
                } else {
                    Err(ParseError::UndeclaredRegister {
                        line,
                        name: op.register,
                    })
                }
            })
            .collect()
    }

    fn check_bounds(&self, line: usize, indices: Vec<u64>) -> ParseResult<Vec<QubitId>> {
        let (name, size) = match &self.register {
            Some(r) => (r.name.as_str(), r.size),
            None => ("", 0),
        };
        indices
            .into_iter()
            .map(|index| {
                if index < u64::from(size) {
                    // index < size ≤ u32::MAX
                    Ok(QubitId(index as u32))
                } else {
                    Err(ParseError::IndexOutOfBounds {
                        line,
                        register: name.to_string(),
                        index,
                        size,
                    })
                }
            })
            .collect()
    }
}

fn unsupported(line: usize, construct: &str) -> ParseError {
    ParseError::Unsupported {
        line,
        construct: construct.to_string(),
    }
}
