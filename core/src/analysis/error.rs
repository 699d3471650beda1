use std::fmt;

use crate::{ast::AccessLevel, token::Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisErrorKind {
    /// Identifier, function, struct or type with no resolvable symbol
    NotFound { name: String },
    ModuleNotFound { path: Vec<String> },
    /// Non-public symbol used from outside its module
    AccessLevel { access: AccessLevel, name: String },
    PrivateImport { name: String },
    /// Import names something the origin module does not declare
    MissingImport { name: String },
    WrongArgumentCount {
        name: String,
        min: usize,
        max: Option<usize>,
        actual: usize,
        variadic: bool,
    },
    InvalidAssignment { parsed_as_call: bool },
    DuplicateStructField { name: String, field: String },
    MisplacedDefaultParameter,
    MisplacedVariadicParameter,
    NonLiteralDefault,
    InvalidNumberLiteral { literal: String },
    ExpectedClosure,
    UnexpectedClosure { program_call: bool },
    /// `|err` / `|all` with something other than a program on the left
    InvalidRedirection { operator: String },
    EnvironmentDestructure,
    /// `closure(...)` outside a function declared with closure support
    UnexpectedClosureCall,
    ExpectedCallAfterPipe,
}

impl fmt::Display for AnalysisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AnalysisErrorKind::*;
        match self {
            NotFound { name } => write!(f, "Could not find symbol '{name}'"),
            ModuleNotFound { path } => write!(f, "Could not find module '{}'", path.join("::")),
            AccessLevel { access, name } => write!(f, "Cannot access {access} symbol '{name}'"),
            PrivateImport { name } => write!(f, "Cannot import private symbol '{name}'"),
            MissingImport { name } => write!(f, "Module does not contain symbol '{name}'"),
            WrongArgumentCount {
                name,
                min,
                max,
                actual,
                variadic,
            } => {
                let expected = match (max, variadic) {
                    (_, true) | (None, _) => format!("at least {min}"),
                    (Some(max), false) if max == min => format!("{min}"),
                    (Some(max), false) => format!("{min}-{max}"),
                };
                write!(f, "Wrong number of arguments to '{name}'. Expected {expected} but got {actual}")
            }
            InvalidAssignment { parsed_as_call: true } => write!(
                f,
                "Invalid assignment. The left expression was parsed as a call, but a variable was expected"
            ),
            InvalidAssignment { parsed_as_call: false } => write!(f, "Invalid assignment"),
            DuplicateStructField { name, field } => write!(f, "Duplicate field '{field}' in struct '{name}'"),
            MisplacedDefaultParameter => {
                write!(f, "Optional parameters may only occur at the end of parameter lists")
            }
            MisplacedVariadicParameter => {
                write!(f, "Variadic parameters may only occur at the end of parameter lists")
            }
            NonLiteralDefault => write!(f, "Expected literal or empty collection as default parameter"),
            InvalidNumberLiteral { literal } => write!(f, "Invalid number literal '{literal}'"),
            ExpectedClosure => write!(f, "Expected closure."),
            UnexpectedClosure { program_call: true } => write!(
                f,
                "Unexpected closure. The call was evaluated as a program invocation since a function with this name could not be found."
            ),
            UnexpectedClosure { program_call: false } => write!(f, "Unexpected closure."),
            InvalidRedirection { operator } => {
                write!(f, "Cannot use '{operator}' on a non-program value")
            }
            EnvironmentDestructure => write!(f, "Cannot destructure into an environment variable"),
            UnexpectedClosureCall => write!(
                f,
                "Unexpected call to 'closure'. This function can only be called within functions with a closure signature."
            ),
            ExpectedCallAfterPipe => write!(f, "Expected function call to the right of pipe."),
        }
    }
}

/// Semantic error with the best-known source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    pub kind: AnalysisErrorKind,
    pub span: Option<Span>,
}

impl AnalysisError {
    pub fn new(kind: AnalysisErrorKind) -> Self {
        Self { kind, span: None }
    }

    pub fn with_span(kind: AnalysisErrorKind, span: Span) -> Self {
        Self { kind, span: Some(span) }
    }

    /// Attaches `span` unless a more specific one is already set.
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl From<AnalysisErrorKind> for AnalysisError {
    fn from(kind: AnalysisErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "{} at {}", self.kind, span)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for AnalysisError {}

pub type Result<T> = std::result::Result<T, AnalysisError>;

pub(crate) fn err<T>(kind: AnalysisErrorKind) -> Result<T> {
    Err(AnalysisError::new(kind))
}
