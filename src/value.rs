use std::{fmt, sync::LazyLock};

use indexmap::IndexMap;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind},
    lexer::{Token, TokenKind},
};

/// A postfix program element: either a number or one of the fixed operator
/// tags the evaluator dispatches on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Dup,
    Print,
}

static WORDS: LazyLock<IndexMap<&'static str, Value>> = LazyLock::new(|| {
    IndexMap::from([
        ("d", Value::Dup),
        ("dup", Value::Dup),
        ("p", Value::Print),
        ("print", Value::Print),
    ])
});

impl Value {
    /// Maps one postfix-ordered token into the evaluator domain. Returns
    /// `None` for statement separators, which have no stack effect. This is
    /// the layer that turns `Unknown` tokens and non-evaluable kinds into
    /// typed errors; the lexer itself never aborts on them.
    pub fn from_token(token: &Token, source: &str) -> Result<Option<Value>, Diagnostic> {
        let value = match token.kind {
            TokenKind::Number => {
                let text = token.text(source);
                let number = text.parse::<f64>().map_err(|_| {
                    Diagnostic::new(
                        DiagnosticKind::Runtime,
                        format!("`{text}` is not a representable number"),
                    )
                    .with_span(token.span)
                })?;
                Value::Number(number)
            }
            TokenKind::Plus => Value::Add,
            TokenKind::Minus => Value::Sub,
            TokenKind::Star => Value::Mul,
            TokenKind::Slash => Value::Div,
            TokenKind::Caret => Value::Pow,
            TokenKind::Identifier => {
                let text = token.text(source);
                match WORDS.get(text) {
                    Some(value) => *value,
                    None => {
                        return Err(Diagnostic::new(
                            DiagnosticKind::Runtime,
                            format!("unknown word `{text}`"),
                        )
                        .with_span(token.span));
                    }
                }
            }
            TokenKind::Semicolon => return Ok(None),
            TokenKind::Unknown => {
                return Err(Diagnostic::new(
                    DiagnosticKind::Lexer,
                    format!("invalid token `{}`", token.text(source)),
                )
                .with_span(token.span));
            }
            _ => {
                return Err(Diagnostic::new(
                    DiagnosticKind::Runtime,
                    format!("`{}` has no meaning on the value stack", token.text(source)),
                )
                .with_span(token.span));
            }
        };
        Ok(Some(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Add => write!(f, "+"),
            Value::Sub => write!(f, "-"),
            Value::Mul => write!(f, "*"),
            Value::Div => write!(f, "/"),
            Value::Pow => write!(f, "^"),
            Value::Dup => write!(f, "dup"),
            Value::Print => write!(f, "print"),
        }
    }
}
