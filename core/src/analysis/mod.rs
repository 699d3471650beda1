//! Semantic analysis.
//!
//! Takes a parsed tree together with the module scope the pre-pass built for
//! it and produces a replacement tree in which every identifier is bound,
//! every call is classified, every closure knows what it captures and every
//! literal carries its typed value.
//!
//! Analysis is fail-fast: the first error aborts the module and is returned
//! with the position of the innermost node being visited.

mod call;
mod closure;
mod error;
mod literal;
mod resolve;
mod semantic_tokens;
mod session;
mod walker;

#[cfg(test)]
mod call_test;
#[cfg(test)]
mod literal_test;
#[cfg(test)]
mod test_support;

pub use error::*;
pub use semantic_tokens::{SemanticCategory, SemanticToken};
pub use session::AnalysisSession;

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    ast::{Ast, ClosureId, Enclosing},
    registry::StdRegistry,
    scope::{AnalysisStatus, FunctionId, ModuleId, ScopeId, ScopeTree},
    util::fast_map::{FastHashMap, FastHashSet, fast_hash_map_new, fast_hash_set_new},
};

/// How a caller wants an already analysed module to be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisScope {
    /// Analyse a module at most once; later requests get the stored tree.
    #[default]
    OncePerModule,
    /// Always analyse the given tree, e.g. a REPL line or an editor buffer.
    OverwriteExistingModule,
}

/// Bookkeeping for a closure whose body is being (or has been) walked.
#[derive(Debug, Clone)]
pub(crate) struct ClosureFrame {
    pub(crate) body_scope: ScopeId,
    pub(crate) parameters: Vec<String>,
    pub(crate) captured: BTreeSet<String>,
    /// Function or closure the closure expression itself sits in
    pub(crate) owner: Option<Enclosing>,
}

pub struct Analyzer<'a> {
    tree: &'a mut ScopeTree,
    registry: &'a dyn StdRegistry,
    scope: ScopeId,
    enclosing: Option<Enclosing>,
    closures: Vec<ClosureFrame>,
    /// Closure support of the functions entered so far
    closure_support: FastHashMap<FunctionId, bool>,
    /// Functions whose closure carrier is used inside a nested closure
    captured_carriers: FastHashSet<FunctionId>,
    semantic_tokens: Option<Vec<SemanticToken>>,
}

impl<'a> Analyzer<'a> {
    fn new(tree: &'a mut ScopeTree, registry: &'a dyn StdRegistry, module: ModuleId) -> Self {
        let scope = tree.module(module).scope;
        Self {
            tree,
            registry,
            scope,
            enclosing: None,
            closures: Vec::new(),
            closure_support: fast_hash_map_new(),
            captured_carriers: fast_hash_set_new(),
            semantic_tokens: None,
        }
    }

    /// Analyses `ast`, the contents of `module`.
    ///
    /// With [`AnalysisScope::OncePerModule`] a module that is already
    /// analysed is not walked again: the stored tree is returned and no
    /// symbols are registered.
    pub fn analyze(
        tree: &mut ScopeTree,
        registry: &dyn StdRegistry,
        ast: Ast,
        module: ModuleId,
        analysis_scope: AnalysisScope,
    ) -> Result<Ast> {
        if analysis_scope == AnalysisScope::OncePerModule {
            let existing = tree.module(module);
            if existing.status == AnalysisStatus::Analysed
                && let Some(stored) = &existing.ast
            {
                debug!(target: "shale::analysis", module = %existing.name, "module already analysed");
                return Ok(stored.clone());
            }
        }

        let mut analyzer = Analyzer::new(tree, registry, module);
        analyzer.start(ast, module, analysis_scope)
    }

    /// Walks `ast` in editor-tooling mode and returns the semantic tokens it
    /// covers, ordered by position. The replacement tree is discarded.
    pub fn semantic_tokens(
        tree: &mut ScopeTree,
        registry: &dyn StdRegistry,
        ast: Ast,
        module: ModuleId,
    ) -> Result<Vec<SemanticToken>> {
        let mut analyzer = Analyzer::new(tree, registry, module);
        analyzer.semantic_tokens = Some(Vec::new());
        analyzer.start(ast, module, AnalysisScope::OverwriteExistingModule)?;

        let mut tokens = analyzer.semantic_tokens.take().unwrap_or_default();
        tokens.sort_by_key(|token| (token.span.start.offset, token.span.end.offset));
        Ok(tokens)
    }

    fn start(&mut self, ast: Ast, module: ModuleId, analysis_scope: AnalysisScope) -> Result<Ast> {
        // Set before the walk so the status is never `None` afterwards. Import
        // cycles are cut by `AnalysisSession`, not by this flag.
        self.tree.module_mut(module).status = AnalysisStatus::Analysed;
        debug!(
            target: "shale::analysis",
            module = %self.tree.module(module).name,
            expressions = ast.expressions.len(),
            "analysing module"
        );

        let result = self.resolve_imports(module).and_then(|()| {
            let mut expressions = Vec::with_capacity(ast.expressions.len());
            for expr in ast.expressions {
                expressions.push(self.next(expr)?);
            }
            Ok(Ast::new(expressions))
        });

        match result {
            Ok(analysed) => {
                if analysis_scope == AnalysisScope::OncePerModule {
                    self.tree.module_mut(module).ast = Some(analysed.clone());
                }
                debug!(target: "shale::analysis", module = %self.tree.module(module).name, "module analysed");
                Ok(analysed)
            }
            Err(error) => {
                self.tree.module_mut(module).status = AnalysisStatus::Failed;
                debug!(target: "shale::analysis", module = %self.tree.module(module).name, %error, "module failed");
                Err(error)
            }
        }
    }

    fn current_module(&self) -> ModuleId {
        self.tree.scope(self.scope).module
    }

    fn closure(&self, id: ClosureId) -> &ClosureFrame {
        &self.closures[id.0 as usize]
    }

    fn closure_mut(&mut self, id: ClosureId) -> &mut ClosureFrame {
        &mut self.closures[id.0 as usize]
    }
}
