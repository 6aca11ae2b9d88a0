use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostic, DiagnosticKind, SourceSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    Let,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    Bool,
    Keyword(Keyword),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Assign,
    EqualEqual,
    BangEqual,
    QuestionEqual,
    Dot,
    Colon,
    At,
    Pipe,
    Dollar,
    Percent,
    Semicolon,
    Unknown,
    Eof,
}

/// A token is a kind plus a half-open byte span into the source buffer.
/// No lexeme text is copied during lexing; callers recover it by slicing.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

static KEYWORDS: LazyLock<IndexMap<&'static str, TokenKind>> = LazyLock::new(|| {
    IndexMap::from([
        ("yes", TokenKind::Bool),
        ("no", TokenKind::Bool),
        ("let", TokenKind::Keyword(Keyword::Let)),
    ])
});

pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: usize,
    peeked: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Self {
            source,
            chars: source.char_indices(),
            current: 0,
            peeked: None,
        };
        // A leading byte-order-mark never belongs to a token span.
        if let Some((_, '\u{feff}')) = lexer.peek() {
            lexer.bump();
        }
        lexer
    }

    /// Builds a lexer over a raw byte buffer. Malformed UTF-8 fails here,
    /// before any token is produced.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, Diagnostic> {
        match std::str::from_utf8(bytes) {
            Ok(source) => Ok(Self::new(source)),
            Err(err) => Err(
                Diagnostic::new(DiagnosticKind::Lexer, "source is not valid UTF-8").with_note(
                    format!("invalid byte sequence at offset {}", err.valid_up_to()),
                ),
            ),
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = if let Some((idx, ch)) = self.peeked.take() {
            Some((idx, ch))
        } else {
            self.chars.next()
        };
        if let Some((idx, ch)) = next {
            self.current = idx + ch.len_utf8();
            Some((idx, ch))
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn match_next(&mut self, expected: char) -> bool {
        if let Some((idx, ch)) = self.peek() {
            if ch == expected {
                self.peeked = None;
                self.current = idx + ch.len_utf8();
                true
            } else {
                false
            }
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let mut progressed = false;

            while let Some((_, ch)) = self.peek() {
                if matches!(ch, ' ' | '\t' | '\r' | '\n') {
                    self.bump();
                    progressed = true;
                } else {
                    break;
                }
            }

            if let Some((_, '#')) = self.peek() {
                self.bump();
                while let Some((_, ch)) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.bump();
                }
                progressed = true;
            }

            if !progressed {
                break;
            }
        }
    }

    fn identifier_or_keyword(&mut self, start: usize) -> Token {
        while let Some((_, ch)) = self.peek() {
            if is_identifier_continue(ch) {
                self.bump();
            } else {
                break;
            }
        }
        let lexeme = &self.source[start..self.current];
        let kind = KEYWORDS
            .get(lexeme)
            .cloned()
            .unwrap_or(TokenKind::Identifier);
        Token {
            kind,
            span: SourceSpan::new(start, self.current),
        }
    }

    fn number_or_identifier(&mut self, start: usize) -> Token {
        while let Some((_, ch)) = self.peek() {
            if ch.is_ascii_digit() {
                self.bump();
            } else {
                break;
            }
        }
        // A digit run glued to an identifier character is one identifier,
        // never a number followed by a word.
        if let Some((_, ch)) = self.peek() {
            if is_identifier_continue(ch) {
                return self.identifier_or_keyword(start);
            }
        }
        self.simple_token(start, TokenKind::Number)
    }

    fn string_literal(&mut self, start: usize) -> Token {
        while let Some((_, ch)) = self.bump() {
            if ch == '"' {
                return self.simple_token(start, TokenKind::String);
            }
        }
        // Input ended before the closing quote; the defect is a token, not
        // a failure, so lexing stays resumable.
        self.simple_token(start, TokenKind::Unknown)
    }

    fn simple_token(&self, start: usize, kind: TokenKind) -> Token {
        Token {
            kind,
            span: SourceSpan::new(start, self.current),
        }
    }

    /// Produces the next token. Once the source is exhausted this returns
    /// an `Eof` token on every subsequent call.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        let (start, ch) = match self.bump() {
            Some(pair) => pair,
            None => {
                return Token {
                    kind: TokenKind::Eof,
                    span: SourceSpan::new(self.current, self.current),
                };
            }
        };

        match ch {
            '0'..='9' => self.number_or_identifier(start),
            c if is_identifier_start(c) => self.identifier_or_keyword(start),
            '"' => self.string_literal(start),
            '(' => self.simple_token(start, TokenKind::LParen),
            ')' => self.simple_token(start, TokenKind::RParen),
            '{' => self.simple_token(start, TokenKind::LBrace),
            '}' => self.simple_token(start, TokenKind::RBrace),
            '[' => self.simple_token(start, TokenKind::LBracket),
            ']' => self.simple_token(start, TokenKind::RBracket),
            '+' => self.simple_token(start, TokenKind::Plus),
            '-' => self.simple_token(start, TokenKind::Minus),
            '*' => self.simple_token(start, TokenKind::Star),
            '/' => self.simple_token(start, TokenKind::Slash),
            '^' => self.simple_token(start, TokenKind::Caret),
            '.' => self.simple_token(start, TokenKind::Dot),
            ':' => self.simple_token(start, TokenKind::Colon),
            '@' => self.simple_token(start, TokenKind::At),
            '|' => self.simple_token(start, TokenKind::Pipe),
            '$' => self.simple_token(start, TokenKind::Dollar),
            '%' => self.simple_token(start, TokenKind::Percent),
            ';' => self.simple_token(start, TokenKind::Semicolon),
            '=' => {
                if self.match_next('=') {
                    self.simple_token(start, TokenKind::EqualEqual)
                } else {
                    self.simple_token(start, TokenKind::Assign)
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.simple_token(start, TokenKind::GreaterEqual)
                } else {
                    self.simple_token(start, TokenKind::Greater)
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.simple_token(start, TokenKind::LessEqual)
                } else {
                    self.simple_token(start, TokenKind::Less)
                }
            }
            '!' => {
                if self.match_next('=') {
                    self.simple_token(start, TokenKind::BangEqual)
                } else {
                    self.simple_token(start, TokenKind::Unknown)
                }
            }
            '?' => {
                if self.match_next('=') {
                    self.simple_token(start, TokenKind::QuestionEqual)
                } else {
                    self.simple_token(start, TokenKind::Unknown)
                }
            }
            _ => self.simple_token(start, TokenKind::Unknown),
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '\'' | '&') || !ch.is_ascii()
}
