//! Signatures of the shale standard library.
//!
//! The analyzer only needs call shapes, so every module here registers
//! [`StdFunction`] / [`StdStruct`] descriptors and nothing else. The table
//! is built once and shared through [`StdBindings::global`].

pub mod datetime;
pub mod env;
pub mod global;
pub mod io;
pub mod iter;
pub mod math;
pub mod string;
pub mod types;

#[cfg(test)]
mod globals_test;

use once_cell::sync::Lazy;
use shale_core::{
    registry::{StdFunction, StdRegistry, StdStruct, StdType},
    util::fast_map::{FastHashMap, FastHashSet},
};
use tracing::debug;

#[derive(Debug, Default)]
struct StdModule {
    functions: FastHashMap<String, StdFunction>,
    structs: FastHashMap<String, StdStruct>,
}

/// Lookup table for everything the standard library exposes.
#[derive(Debug, Default)]
pub struct StdBindings {
    globals: FastHashMap<String, StdFunction>,
    modules: FastHashMap<String, StdModule>,
    types: FastHashSet<String>,
}

static BINDINGS: Lazy<StdBindings> = Lazy::new(|| {
    let mut bindings = StdBindings::default();
    register_stdlib_globals(&mut bindings);
    register_stdlib_modules(&mut bindings);
    for name in types::RUNTIME_TYPES {
        bindings.types.insert(name.to_string());
    }
    debug!(
        target: "shale::stdlib",
        globals = bindings.globals.len(),
        modules = bindings.modules.len(),
        "standard library bindings ready"
    );
    bindings
});

/// Register every named module
pub fn register_stdlib_modules(bindings: &mut StdBindings) {
    bindings.register_module("str", string::functions(), Vec::new());
    bindings.register_module("iter", iter::functions(), Vec::new());
    bindings.register_module("io", io::functions(), io::structs());
    bindings.register_module("env", env::functions(), Vec::new());
    bindings.register_module("math", math::functions(), Vec::new());
    bindings.register_module("datetime", datetime::functions(), datetime::structs());
}

/// Register the functions callable without a module path
pub fn register_stdlib_globals(bindings: &mut StdBindings) {
    for function in global::functions() {
        bindings.globals.insert(function.name.clone(), function);
    }
}

impl StdBindings {
    /// The shared, lazily built table.
    pub fn global() -> &'static StdBindings {
        &BINDINGS
    }

    pub fn register_module(&mut self, name: &str, functions: Vec<StdFunction>, structs: Vec<StdStruct>) {
        let module = self.modules.entry(name.to_string()).or_default();
        for function in functions {
            let function = function.in_module(name);
            module.functions.insert(function.name.clone(), function);
        }
        for mut structure in structs {
            structure.module = name.to_string();
            module.structs.insert(structure.name.clone(), structure);
        }
    }

    /// Names of the registered modules, sorted.
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl StdRegistry for StdBindings {
    fn function(&self, name: &str, module_path: &[String]) -> Option<StdFunction> {
        match module_path {
            [] => self.globals.get(name).cloned(),
            [module] => self.modules.get(module)?.functions.get(name).cloned(),
            _ => None,
        }
    }

    fn structure(&self, name: &str, module: &str) -> Option<StdStruct> {
        self.modules.get(module)?.structs.get(name).cloned()
    }

    fn has_module(&self, module_path: &[String]) -> bool {
        matches!(module_path, [module] if self.modules.contains_key(module))
    }

    fn runtime_type(&self, name: &str) -> Option<StdType> {
        self.types.contains(name).then(|| StdType { name: name.to_string() })
    }
}

/// Struct descriptor with a fixed argument range.
pub(crate) fn structure(name: &str, min_argument_count: usize, max_argument_count: usize) -> StdStruct {
    StdStruct {
        name: name.to_string(),
        module: String::new(),
        min_argument_count,
        max_argument_count,
        variadic_start: None,
    }
}
