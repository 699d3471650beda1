use serde::Serialize;

use super::Analyzer;
use crate::token::Span;

/// What an identifier or literal in the source turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticCategory {
    Module,
    Struct,
    Function,
    StdFunction,
    BuiltIn,
    Program,
    Parameter,
    Variable,
    EnvironmentVariable,
    Property,
    Type,
    String,
    Number,
    Constant,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SemanticToken {
    pub span: Span,
    pub category: SemanticCategory,
}

impl Analyzer<'_> {
    /// Records a token when running in semantic-token mode.
    pub(super) fn push_token(&mut self, span: Span, category: SemanticCategory) {
        if let Some(tokens) = self.semantic_tokens.as_mut() {
            tokens.push(SemanticToken { span, category });
        }
    }
}
