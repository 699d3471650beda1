use serde::{Deserialize, Serialize};

use super::ModuleId;
use crate::ast::{AccessLevel, Parameter};

/// Analysis progress of a module or function. Moves from `None` to one of the
/// other two states and stays there for the rest of an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[default]
    None,
    Analysed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSymbol {
    pub name: String,
    /// Referenced from inside a closure, so the runtime must keep it alive
    #[serde(default)]
    pub is_captured: bool,
}

impl VariableSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_captured: false,
        }
    }
}

/// Name of the implicit variable carrying the closure passed to a function
/// declared with closure support.
pub const CLOSURE_CARRIER: &str = "closure";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSymbol {
    pub name: String,
    #[serde(default)]
    pub access: AccessLevel,
    pub module: ModuleId,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub has_closure: bool,
    /// The closure carrier is used from inside a nested closure
    #[serde(default)]
    pub closure_captured: bool,
    #[serde(default)]
    pub status: AnalysisStatus,
}

impl FunctionSymbol {
    pub fn is_variadic(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.is_variadic)
    }

    /// Number of parameters a call has to supply.
    pub fn min_argument_count(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| p.default_value.is_none() && !p.is_variadic)
            .count()
    }

    /// `None` when the last parameter is variadic.
    pub fn max_argument_count(&self) -> Option<usize> {
        if self.is_variadic() {
            None
        } else {
            Some(self.parameters.len())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructSymbol {
    pub name: String,
    #[serde(default)]
    pub access: AccessLevel,
    pub module: ModuleId,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}
