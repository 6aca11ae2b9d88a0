use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, SourceSpan},
    lexer::{Lexer, Token, TokenKind},
};

enum State {
    ReadInput,
    PushingOp(Token),
    ClosingParen(SourceSpan),
    FlushingStatement(Token),
    Draining,
    Done,
}

/// Reorders an infix token stream into postfix order, pulling tokens from
/// the lexer one at a time. Each `next_token` call does the minimal work to
/// produce exactly one output token; all progress between calls lives in
/// the explicit state value and the operator stack, so nothing is buffered
/// ahead of demand.
pub struct ShuntingYard<'a> {
    lexer: Lexer<'a>,
    stack: Vec<Token>,
    state: State,
}

impl<'a> ShuntingYard<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            stack: Vec::new(),
            state: State::ReadInput,
        }
    }

    /// Produces the next postfix-ordered token, or `None` once the input is
    /// exhausted and the operator stack is drained. An unmatched closing
    /// parenthesis is the one hard failure; it leaves the converter in its
    /// terminal state.
    pub fn next_token(&mut self) -> Result<Option<Token>, Diagnostic> {
        loop {
            match std::mem::replace(&mut self.state, State::ReadInput) {
                State::ReadInput => {
                    let token = self.lexer.next_token();
                    match token.kind {
                        TokenKind::Eof => self.state = State::Draining,
                        TokenKind::Identifier | TokenKind::Number => return Ok(Some(token)),
                        TokenKind::LParen => self.stack.push(token),
                        TokenKind::RParen => self.state = State::ClosingParen(token.span),
                        TokenKind::Semicolon => self.state = State::FlushingStatement(token),
                        _ if precedence(&token.kind).is_some() => {
                            self.state = State::PushingOp(token);
                        }
                        _ => return Ok(Some(token)),
                    }
                }
                State::PushingOp(op) => {
                    if let Some(top) = self.stack.pop() {
                        if top.kind != TokenKind::LParen && dominates(&top.kind, &op.kind) {
                            self.state = State::PushingOp(op);
                            return Ok(Some(top));
                        }
                        self.stack.push(top);
                    }
                    self.stack.push(op);
                }
                State::ClosingParen(span) => match self.stack.pop() {
                    Some(top) if top.kind == TokenKind::LParen => {}
                    Some(top) => {
                        self.state = State::ClosingParen(span);
                        return Ok(Some(top));
                    }
                    None => {
                        self.state = State::Done;
                        return Err(Diagnostic::new(
                            DiagnosticKind::Converter,
                            "unmatched closing parenthesis",
                        )
                        .with_span(span));
                    }
                },
                State::FlushingStatement(separator) => match self.stack.pop() {
                    // A stray `(` is discarded silently while flushing.
                    Some(top) if top.kind == TokenKind::LParen => {
                        self.state = State::FlushingStatement(separator);
                    }
                    Some(top) => {
                        self.state = State::FlushingStatement(separator);
                        return Ok(Some(top));
                    }
                    None => return Ok(Some(separator)),
                },
                State::Draining => match self.stack.pop() {
                    Some(top) if top.kind == TokenKind::LParen => {
                        self.state = State::Draining;
                    }
                    Some(top) => {
                        self.state = State::Draining;
                        return Ok(Some(top));
                    }
                    None => {
                        self.state = State::Done;
                        return Ok(None);
                    }
                },
                State::Done => {
                    self.state = State::Done;
                    return Ok(None);
                }
            }
        }
    }
}

/// Eagerly reorders a whole source buffer into a postfix token sequence.
pub fn reorder(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut converter = ShuntingYard::new(Lexer::new(source));
    let mut output = Vec::new();
    while let Some(token) = converter.next_token()? {
        output.push(token);
    }
    Ok(output)
}

fn precedence(kind: &TokenKind) -> Option<u8> {
    let level = match kind {
        TokenKind::Assign => 1,
        TokenKind::EqualEqual
        | TokenKind::BangEqual
        | TokenKind::QuestionEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual => 2,
        TokenKind::Plus | TokenKind::Minus => 3,
        TokenKind::Star | TokenKind::Slash => 4,
        TokenKind::Caret => 5,
        TokenKind::Dot => 6,
        _ => return None,
    };
    Some(level)
}

fn dominates(top: &TokenKind, incoming: &TokenKind) -> bool {
    match (precedence(top), precedence(incoming)) {
        (Some(above), Some(below)) => {
            above > below || (above == below && !right_associative(incoming))
        }
        _ => false,
    }
}

fn right_associative(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Caret)
}
