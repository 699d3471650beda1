//! Syntax tree shared by the parser, the analyzer and the lowering stage.

pub mod build;
mod expr;
mod ops;
mod visit;


pub use expr::*;
pub use ops::*;

use serde::{Deserialize, Serialize};

/// A parsed (or analysed) source file: its top-level expressions in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ast {
    pub expressions: Vec<Expr>,
}

impl Ast {
    pub fn new(expressions: Vec<Expr>) -> Self {
        Self { expressions }
    }

    /// Pre-order walk over every node of every top-level expression.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        for expr in &self.expressions {
            expr.walk(f);
        }
    }

    /// All nodes matching `pred`, in pre-order.
    pub fn find_all<'a>(&'a self, pred: impl Fn(&Expr) -> bool) -> Vec<&'a Expr> {
        let mut found = Vec::new();
        self.walk(&mut |expr| {
            if pred(expr) {
                found.push(expr);
            }
        });
        found
    }
}
