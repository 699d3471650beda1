//! Arena-backed scope and module graph.
//!
//! The pre-pass builds this tree (scopes for every block, module scopes with
//! their declared functions and structs, and the queue of imports it could
//! not classify). The analyzer links it: it resolves the import queue,
//! declares variables as it walks, and registers analysed function and
//! struct signatures back into their modules.
//!
//! Every cross reference is an index handle (`ScopeId`, `ModuleId`,
//! `FunctionId`, `StructId`); nothing in here owns its parent.

mod module;
mod symbols;

#[cfg(test)]
mod scope_test;

pub use module::*;
pub use symbols::*;

use serde::{Deserialize, Serialize};

use crate::{
    ast::{AccessLevel, Parameter},
    token::Token,
    util::fast_map::FastHashMap,
};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Lexical scope handle
    ScopeId
);
arena_id!(
    /// Module scope handle
    ModuleId
);
arena_id!(FunctionId);
arena_id!(StructId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    /// `None` only for the root scope of a module
    #[serde(default)]
    pub parent: Option<ScopeId>,
    pub module: ModuleId,
    #[serde(default)]
    pub variables: FastHashMap<String, VariableSymbol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    modules: Vec<ModuleScope>,
    #[serde(default)]
    functions: Vec<FunctionSymbol>,
    #[serde(default)]
    structs: Vec<StructSymbol>,
}

fn next_id(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("scope arena overflow ({len} entries)"))
}

impl ScopeTree {
    /// Tree holding only the root module.
    pub fn new(root_name: &str) -> Self {
        let mut tree = Self {
            scopes: Vec::new(),
            modules: Vec::new(),
            functions: Vec::new(),
            structs: Vec::new(),
        };
        tree.push_module(root_name, AccessLevel::Public, None);
        tree
    }

    pub fn root(&self) -> ModuleId {
        ModuleId(0)
    }

    fn push_module(&mut self, name: &str, access: AccessLevel, parent: Option<ModuleId>) -> ModuleId {
        let id = ModuleId(next_id(self.modules.len()));
        let scope = ScopeId(next_id(self.scopes.len()));
        self.scopes.push(Scope {
            parent: None,
            module: id,
            variables: FastHashMap::default(),
        });
        self.modules.push(ModuleScope::new(name, access, parent, scope));
        id
    }

    /// Adds a submodule of `parent`.
    pub fn add_module(&mut self, parent: ModuleId, name: &str, access: AccessLevel) -> ModuleId {
        let id = self.push_module(name, access, Some(parent));
        self.module_mut(parent).submodules.insert(name.to_string(), id);
        id
    }

    /// Adds a child scope of `parent`, in the same module.
    pub fn add_scope(&mut self, parent: ScopeId) -> ScopeId {
        let module = self.scope(parent).module;
        let id = ScopeId(next_id(self.scopes.len()));
        self.scopes.push(Scope {
            parent: Some(parent),
            module,
            variables: FastHashMap::default(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn module(&self, id: ModuleId) -> &ModuleScope {
        &self.modules[id.index()]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut ModuleScope {
        &mut self.modules[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionSymbol {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut FunctionSymbol {
        &mut self.functions[id.index()]
    }

    pub fn structure(&self, id: StructId) -> &StructSymbol {
        &self.structs[id.index()]
    }

    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.modules.len()).map(|i| ModuleId(i as u32))
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0..self.scopes.len()).map(|i| ScopeId(i as u32))
    }

    pub fn function_ids(&self) -> impl Iterator<Item = FunctionId> + '_ {
        (0..self.functions.len()).map(|i| FunctionId(i as u32))
    }

    pub fn contains_module(&self, id: ModuleId) -> bool {
        id.index() < self.modules.len()
    }

    pub fn contains_scope(&self, id: ScopeId) -> bool {
        id.index() < self.scopes.len()
    }

    pub fn contains_function(&self, id: FunctionId) -> bool {
        id.index() < self.functions.len()
    }

    pub fn contains_struct(&self, id: StructId) -> bool {
        id.index() < self.structs.len()
    }

    /// Dotted path of a module from the root, excluding the root itself.
    pub fn module_path(&self, id: ModuleId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(module_id) = current {
            let module = self.module(module_id);
            if module.parent.is_some() {
                path.push(module.name.clone());
            }
            current = module.parent;
        }
        path.reverse();
        path
    }

    // ---------------- pre-pass declarations ----------------

    /// Declares a function as the pre-pass sees it: signature only, not yet
    /// analysed.
    pub fn declare_function(
        &mut self,
        module: ModuleId,
        name: &str,
        access: AccessLevel,
        parameters: Vec<Parameter>,
        has_closure: bool,
    ) -> FunctionId {
        let id = FunctionId(next_id(self.functions.len()));
        self.functions.push(FunctionSymbol {
            name: name.to_string(),
            access,
            module,
            parameters,
            has_closure,
            closure_captured: false,
            status: AnalysisStatus::None,
        });
        self.module_mut(module).functions.insert(name.to_string(), id);
        id
    }

    pub fn declare_struct(
        &mut self,
        module: ModuleId,
        name: &str,
        access: AccessLevel,
        parameters: Vec<Parameter>,
    ) -> StructId {
        let id = StructId(next_id(self.structs.len()));
        self.structs.push(StructSymbol {
            name: name.to_string(),
            access,
            module,
            parameters,
        });
        self.module_mut(module).structs.insert(name.to_string(), id);
        id
    }

    /// Queues `token` to be imported into `module` from `origin` once the
    /// module is analysed.
    pub fn queue_import(&mut self, module: ModuleId, origin: ModuleId, token: Token) {
        self.module_mut(module)
            .unresolved_imports
            .push(UnresolvedImport { origin, token });
    }

    // ---------------- registration ----------------

    /// Replaces the signature stored under `id` with an analysed one and makes
    /// it visible in its module.
    pub fn register_function(&mut self, id: FunctionId, symbol: FunctionSymbol) {
        let module = symbol.module;
        let name = symbol.name.clone();
        self.functions[id.index()] = symbol;
        self.module_mut(module).functions.insert(name, id);
    }

    /// Registers a struct declared in `module`, reusing the pre-pass entry
    /// with the same name when there is one.
    pub fn register_struct(&mut self, symbol: StructSymbol) -> StructId {
        let module = symbol.module;
        if let Some(id) = self.module(module).structs.get(&symbol.name).copied() {
            self.structs[id.index()] = symbol;
            return id;
        }
        let id = StructId(next_id(self.structs.len()));
        let name = symbol.name.clone();
        self.structs.push(symbol);
        self.module_mut(module).structs.insert(name, id);
        id
    }

    // ---------------- variables ----------------

    /// Declares `name` in `scope`. Re-declaring keeps the existing symbol.
    pub fn add_variable(&mut self, scope: ScopeId, name: &str) {
        self.scope_mut(scope)
            .variables
            .entry(name.to_string())
            .or_insert_with(|| VariableSymbol::new(name));
    }

    /// Whether `name` is declared in `scope` itself.
    pub fn has_declaration_of_variable(&self, scope: ScopeId, name: &str) -> bool {
        self.scope(scope).variables.contains_key(name)
    }

    /// Whether `name` is declared in `scope` or any of its ancestors.
    pub fn has_variable(&self, scope: ScopeId, name: &str) -> bool {
        self.find_variable_scope(scope, name).is_some()
    }

    /// Innermost scope on the chain starting at `scope` that declares `name`.
    pub fn find_variable_scope(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if s.variables.contains_key(name) {
                return Some(id);
            }
            current = s.parent;
        }
        None
    }

    pub fn find_variable_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut VariableSymbol> {
        let id = self.find_variable_scope(scope, name)?;
        self.scope_mut(id).variables.get_mut(name)
    }

    pub fn variable(&self, scope: ScopeId, name: &str) -> Option<&VariableSymbol> {
        let id = self.find_variable_scope(scope, name)?;
        self.scope(id).variables.get(name)
    }

    // ---------------- symbol lookup ----------------

    /// Resolves a module path relative to `from`.
    ///
    /// The first segment is looked up among the submodules of `from`, then
    /// (if `look_in_imports`) its imported modules, then the submodules of the
    /// root module. The remaining segments walk submodules only. An empty
    /// path resolves to `from`.
    pub fn find_module(&self, from: ModuleId, path: &[String], look_in_imports: bool) -> Option<ModuleId> {
        let Some((first, rest)) = path.split_first() else {
            return Some(from);
        };

        let mut current = self
            .module(from)
            .find_submodule(first, look_in_imports)
            .or_else(|| self.module(self.root()).find_submodule(first, false))?;
        for segment in rest {
            current = self.module(current).find_submodule(segment, false)?;
        }
        Some(current)
    }

    /// Functions whose analysis failed are not callable and are skipped.
    pub fn find_function(&self, module: ModuleId, name: &str, look_in_imports: bool) -> Option<FunctionId> {
        self.module(module)
            .find_function(name, look_in_imports)
            .filter(|id| self.function(*id).status != AnalysisStatus::Failed)
    }

    pub fn find_struct(&self, module: ModuleId, name: &str, look_in_imports: bool) -> Option<StructId> {
        self.module(module).find_struct(name, look_in_imports)
    }
}
