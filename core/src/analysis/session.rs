use std::collections::BTreeMap;

use tracing::debug;

use super::{AnalysisScope, Analyzer, Result};
use crate::{
    ast::Ast,
    registry::StdRegistry,
    scope::{ModuleId, ScopeTree},
};

/// Analyses a set of modules sharing one scope tree, making sure every
/// module an import refers to is analysed before the importing module.
pub struct AnalysisSession<'a> {
    tree: &'a mut ScopeTree,
    registry: &'a dyn StdRegistry,
    analysis_scope: AnalysisScope,
    pending: BTreeMap<ModuleId, Ast>,
    analysed: BTreeMap<ModuleId, Ast>,
}

impl<'a> AnalysisSession<'a> {
    pub fn new(tree: &'a mut ScopeTree, registry: &'a dyn StdRegistry, analysis_scope: AnalysisScope) -> Self {
        Self {
            tree,
            registry,
            analysis_scope,
            pending: BTreeMap::new(),
            analysed: BTreeMap::new(),
        }
    }

    pub fn add_module(&mut self, module: ModuleId, ast: Ast) {
        self.pending.insert(module, ast);
    }

    /// Analyses every added module and returns the analysed trees by module.
    /// Stops at the first module that fails.
    pub fn run(mut self) -> Result<BTreeMap<ModuleId, Ast>> {
        while let Some(&module) = self.pending.keys().next() {
            self.analyze_module(module)?;
        }
        Ok(self.analysed)
    }

    fn analyze_module(&mut self, module: ModuleId) -> Result<()> {
        // Removing the entry first is what stops import cycles.
        let Some(ast) = self.pending.remove(&module) else {
            return Ok(());
        };

        let mut origins: Vec<ModuleId> = self
            .tree
            .module(module)
            .unresolved_imports
            .iter()
            .map(|import| import.origin)
            .filter(|origin| *origin != module)
            .collect();
        origins.sort();
        origins.dedup();
        for origin in origins {
            debug!(
                target: "shale::analysis",
                module = %self.tree.module(module).name,
                dependency = %self.tree.module(origin).name,
                "analysing import origin first"
            );
            self.analyze_module(origin)?;
        }

        let analysed = Analyzer::analyze(self.tree, self.registry, ast, module, self.analysis_scope)?;
        self.analysed.insert(module, analysed);
        Ok(())
    }
}
