//! Interface to the standard-library signature registry.
//!
//! The analyzer never executes standard-library code; it only needs to know
//! which names exist and what their call shapes are. `shale-stdlib` provides
//! the concrete table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFunction {
    pub name: String,
    /// Owning module, `None` for global functions
    #[serde(default)]
    pub module: Option<String>,
    pub min_argument_count: usize,
    pub max_argument_count: usize,
    /// Index of the first argument collected by a variadic parameter
    #[serde(default)]
    pub variadic_start: Option<usize>,
    /// Must be called with a trailing closure block
    #[serde(default)]
    pub has_closure: bool,
    /// Number of parameters the closure receives, when fixed
    #[serde(default)]
    pub closure_parameter_count: Option<usize>,
    /// Takes a process output stream directly instead of a buffered value
    #[serde(default)]
    pub consumes_pipe: bool,
    /// Starts the processes passed to it itself
    #[serde(default)]
    pub starts_pipe_manually: bool,
}

impl StdFunction {
    pub fn new(name: &str, min_argument_count: usize, max_argument_count: usize) -> Self {
        Self {
            name: name.to_string(),
            module: None,
            min_argument_count,
            max_argument_count,
            variadic_start: None,
            has_closure: false,
            closure_parameter_count: None,
            consumes_pipe: false,
            starts_pipe_manually: false,
        }
    }

    pub fn variadic(name: &str, min_argument_count: usize) -> Self {
        Self {
            variadic_start: Some(min_argument_count),
            ..Self::new(name, min_argument_count, usize::MAX)
        }
    }

    pub fn in_module(mut self, module: &str) -> Self {
        self.module = Some(module.to_string());
        self
    }

    pub fn with_closure(mut self, parameter_count: usize) -> Self {
        self.has_closure = true;
        self.closure_parameter_count = Some(parameter_count);
        self
    }

    pub fn consuming_pipe(mut self) -> Self {
        self.consumes_pipe = true;
        self
    }

    pub fn starting_pipe_manually(mut self) -> Self {
        self.starts_pipe_manually = true;
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic_start.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdStruct {
    pub name: String,
    pub module: String,
    pub min_argument_count: usize,
    pub max_argument_count: usize,
    #[serde(default)]
    pub variadic_start: Option<usize>,
}

impl StdStruct {
    pub fn is_variadic(&self) -> bool {
        self.variadic_start.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StdType {
    pub name: String,
}

pub trait StdRegistry {
    /// Looks up a function by name. An empty `module_path` means the global
    /// namespace.
    fn function(&self, name: &str, module_path: &[String]) -> Option<StdFunction>;

    fn structure(&self, name: &str, module: &str) -> Option<StdStruct>;

    /// Whether `module_path` names a standard-library module. Always false for
    /// an empty path.
    fn has_module(&self, module_path: &[String]) -> bool;

    fn runtime_type(&self, name: &str) -> Option<StdType>;
}

/// Registry with nothing in it. Every call that is not a user function
/// becomes a program call.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRegistry;

impl StdRegistry for EmptyRegistry {
    fn function(&self, _name: &str, _module_path: &[String]) -> Option<StdFunction> {
        None
    }

    fn structure(&self, _name: &str, _module: &str) -> Option<StdStruct> {
        None
    }

    fn has_module(&self, _module_path: &[String]) -> bool {
        false
    }

    fn runtime_type(&self, _name: &str) -> Option<StdType> {
        None
    }
}
