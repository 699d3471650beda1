use serde::{Deserialize, Serialize};

use super::{AnalysisStatus, FunctionId, ModuleId, ScopeId, StructId};
use crate::{
    ast::{AccessLevel, Ast},
    token::Token,
    util::fast_map::FastHashMap,
};

/// Identifier named in an import whose target kind (function, struct or
/// module) is not known until analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedImport {
    /// Module the symbol is imported from
    pub origin: ModuleId,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleScope {
    pub name: String,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default)]
    pub parent: Option<ModuleId>,
    /// Root lexical scope of the module; its variables are the module globals
    pub scope: ScopeId,
    #[serde(default)]
    pub submodules: FastHashMap<String, ModuleId>,
    #[serde(default)]
    pub imported_modules: FastHashMap<String, ModuleId>,
    #[serde(default)]
    pub functions: FastHashMap<String, FunctionId>,
    #[serde(default)]
    pub imported_functions: FastHashMap<String, FunctionId>,
    #[serde(default)]
    pub structs: FastHashMap<String, StructId>,
    #[serde(default)]
    pub imported_structs: FastHashMap<String, StructId>,
    #[serde(default)]
    pub unresolved_imports: Vec<UnresolvedImport>,
    #[serde(default)]
    pub status: AnalysisStatus,
    /// Tree stored by a once-per-module analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<Ast>,
}

impl ModuleScope {
    pub(super) fn new(name: &str, access: AccessLevel, parent: Option<ModuleId>, scope: ScopeId) -> Self {
        Self {
            name: name.to_string(),
            access,
            parent,
            scope,
            submodules: FastHashMap::default(),
            imported_modules: FastHashMap::default(),
            functions: FastHashMap::default(),
            imported_functions: FastHashMap::default(),
            structs: FastHashMap::default(),
            imported_structs: FastHashMap::default(),
            unresolved_imports: Vec::new(),
            status: AnalysisStatus::None,
            ast: None,
        }
    }

    pub fn find_function(&self, name: &str, look_in_imports: bool) -> Option<FunctionId> {
        self.functions.get(name).copied().or_else(|| {
            if look_in_imports {
                self.imported_functions.get(name).copied()
            } else {
                None
            }
        })
    }

    pub fn find_struct(&self, name: &str, look_in_imports: bool) -> Option<StructId> {
        self.structs.get(name).copied().or_else(|| {
            if look_in_imports {
                self.imported_structs.get(name).copied()
            } else {
                None
            }
        })
    }

    pub fn find_submodule(&self, name: &str, look_in_imports: bool) -> Option<ModuleId> {
        self.submodules.get(name).copied().or_else(|| {
            if look_in_imports {
                self.imported_modules.get(name).copied()
            } else {
                None
            }
        })
    }

    pub fn import_function(&mut self, name: &str, id: FunctionId) {
        self.imported_functions.insert(name.to_string(), id);
    }

    pub fn import_struct(&mut self, name: &str, id: StructId) {
        self.imported_structs.insert(name.to_string(), id);
    }

    pub fn import_module(&mut self, name: &str, id: ModuleId) {
        self.imported_modules.insert(name.to_string(), id);
    }

    /// Drains the import queue. The queue is empty afterwards whatever the
    /// caller does with the entries.
    pub fn take_unresolved_imports(&mut self) -> Vec<UnresolvedImport> {
        std::mem::take(&mut self.unresolved_imports)
    }
}
