use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::RedirectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    In,
    And,
    Or,
    Coalescing,
    /// `=`; the left side must be an assignable target
    Equals,
    /// `|`
    Pipe,
    /// `|err`
    PipeErr,
    /// `|all`
    PipeAll,
    /// `&&` between commands: runs the right side only if the left succeeded
    NonRedirectingAnd,
    /// `||` between commands
    NonRedirectingOr,
}

impl BinaryOp {
    pub fn is_pipe(self) -> bool {
        matches!(self, BinaryOp::Pipe | BinaryOp::PipeErr | BinaryOp::PipeAll)
    }

    pub fn is_non_redirecting(self) -> bool {
        matches!(self, BinaryOp::NonRedirectingAnd | BinaryOp::NonRedirectingOr)
    }

    /// Stream captured from the left side of a pipe operator.
    pub fn redirection_kind(self) -> Option<RedirectionKind> {
        match self {
            BinaryOp::Pipe => Some(RedirectionKind::Output),
            BinaryOp::PipeErr => Some(RedirectionKind::Error),
            BinaryOp::PipeAll => Some(RedirectionKind::All),
            _ => None,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Ge => ">=",
            BinaryOp::Le => "<=",
            BinaryOp::In => "in",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Coalescing => "??",
            BinaryOp::Equals => "=",
            BinaryOp::Pipe => "|",
            BinaryOp::PipeErr => "|err",
            BinaryOp::PipeAll => "|all",
            BinaryOp::NonRedirectingAnd => "&&",
            BinaryOp::NonRedirectingOr => "||",
        };
        write!(f, "{s}")
    }
}
