//! Lexer for the Python-style vocabularies.
//!
//! Only the handful of shapes the emitters produce matter to the importer;
//! everything else is tokenized and skipped.

use logos::Logos;

use crate::error::{ConvertError, ConvertResult};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum Token {
    #[regex(r"#[^\n]*", |lex| lex.slice()[1..].trim().to_string())]
    Comment(String),

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Int(u64),

    #[regex(r#""[^"\n]*""#)]
    #[regex(r"'[^'\n]*'")]
    Str,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+=")]
    PlusEq,

    #[token("=")]
    Eq,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Comment(c) => write!(f, "# {c}"),
            Token::Float(v) => write!(f, "{v:?}"),
            Token::Int(v) => write!(f, "{v}"),
            Token::Str => write!(f, "string literal"),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::PlusEq => write!(f, "+="),
            Token::Eq => write!(f, "="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Tokenize Python-style source, tagging each token with its 1-based line.
pub(crate) fn tokenize(source: &str) -> ConvertResult<Vec<SpannedToken>> {
    let starts: Vec<usize> = std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let line_of = |offset: usize| match starts.binary_search(&offset) {
        Ok(i) => i + 1,
        Err(i) => i,
    };

    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let line = line_of(span.start);
        match result {
            Ok(token) => tokens.push(SpannedToken { token, line }),
            Err(()) => {
                return Err(ConvertError::Syntax {
                    line,
                    message: format!("unexpected character sequence '{}'", &source[span]),
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
    fn test_pyquil_line() {
        assert_eq!(
            kinds("program += RZ(-1.5e-3, 2)"),
            vec![
                Token::Identifier("program".into()),
                Token::PlusEq,
                Token::Identifier("RZ".into()),
                Token::LParen,
                Token::Minus,
                Token::Float(1.5e-3),
                Token::Comma,
                Token::Int(2),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_comment_keeps_text() {
        assert_eq!(kinds("    # qubits: 4\n"), vec![Token::Comment("qubits: 4".into())]);
    }

    #[test]
    fn test_lines() {
        let tokens = tokenize("import cirq\n\ncircuit").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_bad_character() {
        let err = tokenize("x = 1\ny = $").unwrap_err();
        assert!(matches!(err, ConvertError::Syntax { line: 2, .. }));
    }
}
