//! Lexer for the `OpenQASM` 2 subset.

use logos::Logos;

/// Tokens for `OpenQASM` 2.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("if")]
    If,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    /// Digits only; read as an index or as a real depending on position.
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("==")]
    EqEq,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::Qreg => write!(f, "qreg"),
            Token::Creg => write!(f, "creg"),
            Token::Gate => write!(f, "gate"),
            Token::Opaque => write!(f, "opaque"),
            Token::If => write!(f, "if"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(s) => write!(f, "{s}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::EqEq => write!(f, "=="),
            Token::Arrow => write!(f, "->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its 1-based source line.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Lexer failure with the position of the offending slice.
#[derive(Debug, Clone)]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Byte offsets of line starts, for offset → line/column lookup.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based (line, column) of a byte offset.
    fn locate(&self, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line + 1, offset - self.starts[line] + 1)
    }
}

/// Tokenize a QASM2 source string.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let lines = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let (line, column) = lines.locate(span.start);
        match result {
            Ok(token) => tokens.push(SpannedToken { token, line }),
            Err(()) => {
                let slice = &source[span];
                return Err(LexError {
                    line,
                    column,
                    message: format!("Invalid token: '{slice}'"),
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = kinds("OPENQASM 2.0;");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::OpenQasm);
        assert!(matches!(tokens[1], Token::FloatLiteral(v) if (v - 2.0).abs() < 1e-12));
        assert_eq!(tokens[2], Token::Semicolon);
    }

    #[test]
    fn test_register_declaration() {
        let tokens = kinds("qreg q[3];");
        assert_eq!(tokens[0], Token::Qreg);
        assert!(matches!(tokens[1], Token::Identifier(ref s) if s == "q"));
        assert_eq!(tokens[2], Token::LBracket);
        assert_eq!(tokens[3], Token::IntLiteral("3".into()));
        assert_eq!(tokens[4], Token::RBracket);
        assert_eq!(tokens[5], Token::Semicolon);
    }

    #[test]
    fn test_parameterized_gate() {
        let tokens = kinds("rz(-1.5e-3) q[0];");
        assert!(matches!(tokens[0], Token::Identifier(ref s) if s == "rz"));
        assert_eq!(tokens[1], Token::LParen);
        assert_eq!(tokens[2], Token::Minus);
        assert!(matches!(tokens[3], Token::FloatLiteral(v) if (v - 1.5e-3).abs() < 1e-15));
        assert_eq!(tokens[4], Token::RParen);
    }

    #[test]
    fn test_integer_wider_than_u64() {
        let tokens = kinds("rz(99999999999999999999) q[0];");
        assert!(matches!(tokens[2], Token::IntLiteral(ref s) if s == "99999999999999999999"));
    }

    #[test]
    fn test_measure_arrow() {
        let tokens = kinds("measure q[0] -> c[0];");
        assert!(tokens.contains(&Token::Arrow));
    }

    #[test]
    fn test_comments() {
        let source = r"
            // This is a comment
            qreg q[1];
            /* Multi-line
               comment */
            h q[0];
        ";
        let tokens = kinds(source);
        assert_eq!(tokens.len(), 12);
    }

    #[test]
    fn test_line_tracking() {
        let tokens = tokenize("OPENQASM 2.0;\n\nqreg q[2];\n").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_invalid_token() {
        let err = tokenize("qreg q[2];\nh q[0] $;").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 8);
        assert!(err.message.contains('$'));
    }
}
