//! Tokens as handed over by the parser.
//!
//! The analyzer only needs the token kind (to type literals), its text and
//! its span; the lexer itself lives outside this crate.

mod span;


pub use span::*;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    DoubleQuoteStringLiteral,
    SingleQuoteStringLiteral,
    /// Bare word passed to a program call in text-argument style (`ls -la`)
    TextArgumentStringLiteral,
    /// Embedded shell fragment, `$:` followed by the raw command
    BashLiteral,
    True,
    False,
    Nil,
    Return,
    Break,
    Continue,
    Throw,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::DoubleQuoteStringLiteral
                | TokenKind::SingleQuoteStringLiteral
                | TokenKind::TextArgumentStringLiteral
                | TokenKind::BashLiteral
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Return | TokenKind::Break | TokenKind::Continue | TokenKind::Throw
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    #[serde(default)]
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    pub fn identifier(value: impl Into<String>, span: Span) -> Self {
        Self::new(TokenKind::Identifier, value, span)
    }

    /// Same kind and span, different text. Used for synthesized names.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            value: value.into(),
            span: self.span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
