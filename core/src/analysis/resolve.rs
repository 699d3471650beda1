use tracing::{debug, trace};

use super::{AnalysisError, AnalysisErrorKind, Analyzer, Result, SemanticCategory, err, walker::node};
use crate::{
    ast::{AccessLevel, Enclosing, Expr, ExprKind, VariableExpr},
    scope::{ModuleId, ScopeId, UnresolvedImport},
    token::Span,
};

impl Analyzer<'_> {
    /// Binds the imports queued by the pre-pass. The queue is drained whether
    /// or not every import resolves.
    pub(super) fn resolve_imports(&mut self, module: ModuleId) -> Result<()> {
        let imports = self.tree.module_mut(module).take_unresolved_imports();
        for UnresolvedImport { origin, token } in imports {
            let name = token.value.as_str();
            let private = |access: AccessLevel| {
                (access != AccessLevel::Public).then(|| {
                    AnalysisError::with_span(AnalysisErrorKind::PrivateImport { name: name.to_string() }, token.span)
                })
            };

            if let Some(id) = self.tree.find_function(origin, name, false) {
                if let Some(error) = private(self.tree.function(id).access) {
                    return Err(error);
                }
                self.tree.module_mut(module).import_function(name, id);
            } else if let Some(id) = self.tree.find_struct(origin, name, false) {
                if let Some(error) = private(self.tree.structure(id).access) {
                    return Err(error);
                }
                self.tree.module_mut(module).import_struct(name, id);
            } else if let Some(id) = self.tree.module(origin).find_submodule(name, false) {
                if let Some(error) = private(self.tree.module(id).access) {
                    return Err(error);
                }
                self.tree.module_mut(module).import_module(name, id);
            } else {
                return Err(AnalysisError::with_span(
                    AnalysisErrorKind::MissingImport { name: name.to_string() },
                    token.span,
                ));
            }

            debug!(
                target: "shale::analysis",
                name,
                from = %self.tree.module(origin).name,
                into = %self.tree.module(module).name,
                "resolved import"
            );
        }
        Ok(())
    }

    pub(super) fn visit_variable(&mut self, variable: VariableExpr, span: Span, is_root: bool) -> Result<Expr> {
        let is_environment = variable.is_environment_variable();
        let VariableExpr { name, .. } = variable;
        if !is_environment && !self.tree.has_variable(self.scope, &name.value) {
            return err(AnalysisErrorKind::NotFound { name: name.value });
        }

        let is_captured = !is_environment && self.capture_variable(&name.value);
        self.push_token(
            name.span,
            if is_environment {
                SemanticCategory::EnvironmentVariable
            } else {
                SemanticCategory::Variable
            },
        );

        Ok(node(
            ExprKind::Variable(VariableExpr {
                name,
                scope: Some(self.scope),
                is_captured,
            }),
            span,
            is_root,
        ))
    }

    /// Records `name` as captured by the closure currently being walked when
    /// it is declared outside that closure. Returns whether it was captured.
    fn capture_variable(&mut self, name: &str) -> bool {
        let Some(Enclosing::Closure(id)) = self.enclosing else {
            return false;
        };
        let body_scope = self.closure(id).body_scope;
        let Some(outside) = self.tree.scope(body_scope).parent else {
            return false;
        };
        let Some(declared_in) = self.tree.find_variable_scope(outside, name) else {
            return false;
        };
        if self.is_declared_between(name, self.scope, body_scope) {
            return false;
        }

        self.closure_mut(id).captured.insert(name.to_string());
        if let Some(symbol) = self.tree.scope_mut(declared_in).variables.get_mut(name) {
            symbol.is_captured = true;
        }
        trace!(target: "shale::analysis", name, closure = id.0, "captured variable");
        true
    }

    /// Whether `name` is declared in a scope on the chain from `from` up to
    /// and including `until`.
    pub(super) fn is_declared_between(&self, name: &str, from: ScopeId, until: ScopeId) -> bool {
        let mut current = Some(from);
        while let Some(id) = current {
            if self.tree.has_declaration_of_variable(id, name) {
                return true;
            }
            if id == until {
                return false;
            }
            current = self.tree.scope(id).parent;
        }
        false
    }
}
