//! Serialized analysis input: a pre-populated scope tree plus the parsed
//! trees of the modules to analyse.
//!
//! ```json
//! { "scopes": { ... }, "modules": [ { "module": 0, "ast": { "expressions": [] } } ] }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    ast::{Ast, Expr, ExprKind},
    scope::{ModuleId, ScopeTree},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitModule {
    pub module: ModuleId,
    pub ast: Ast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub scopes: ScopeTree,
    #[serde(default)]
    pub modules: Vec<UnitModule>,
}

impl Unit {
    pub fn from_json(text: &str) -> Result<Unit> {
        let unit: Unit = serde_json::from_str(text).context("failed to parse analysis unit")?;
        unit.validate()?;
        Ok(unit)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize analysis unit")
    }

    /// Rejects handles that point outside the scope tree, so that the
    /// analyzer can index the tree without checking.
    pub fn validate(&self) -> Result<()> {
        let tree = &self.scopes;
        if !tree.contains_module(tree.root()) {
            bail!("scope tree has no root module");
        }
        for id in tree.module_ids() {
            let module = tree.module(id);
            if !tree.contains_scope(module.scope) {
                bail!("module '{}' points at unknown scope {}", module.name, module.scope.0);
            }
            let dangling = module
                .functions
                .values()
                .chain(module.imported_functions.values())
                .any(|f| !tree.contains_function(*f))
                || module
                    .structs
                    .values()
                    .chain(module.imported_structs.values())
                    .any(|s| !tree.contains_struct(*s))
                || module
                    .submodules
                    .values()
                    .chain(module.imported_modules.values())
                    .chain(module.parent.iter())
                    .any(|m| !tree.contains_module(*m));
            if dangling {
                bail!("module '{}' refers to an unknown symbol", module.name);
            }
            if let Some(import) = module.unresolved_imports.iter().find(|i| !tree.contains_module(i.origin)) {
                bail!("import of '{}' names unknown module {}", import.token.value, import.origin.0);
            }
        }

        for id in tree.scope_ids() {
            let scope = tree.scope(id);
            if !tree.contains_module(scope.module) || scope.parent.is_some_and(|p| !tree.contains_scope(p)) {
                bail!("scope {} links to an unknown module or scope", id.0);
            }
        }
        for id in tree.function_ids() {
            let function = tree.function(id);
            if !tree.contains_module(function.module) {
                bail!("function '{}' names unknown module {}", function.name, function.module.0);
            }
        }

        for entry in &self.modules {
            if !tree.contains_module(entry.module) {
                bail!("unit lists unknown module {}", entry.module.0);
            }
            let mut problem = None;
            entry.ast.walk(&mut |expr| {
                if problem.is_some() {
                    return;
                }
                problem = shape_problem(expr).or_else(|| match &expr.kind {
                    ExprKind::Block(block) if !tree.contains_scope(block.scope) => {
                        Some(format!("block at {} uses unknown scope {}", expr.span, block.scope.0))
                    }
                    ExprKind::Function(function) if !tree.contains_function(function.id) => Some(format!(
                        "function '{}' has no declaration (id {})",
                        function.name.value, function.id.0
                    )),
                    ExprKind::Function(function) if !tree.contains_module(function.module) => {
                        Some(format!("function '{}' names unknown module", function.name.value))
                    }
                    ExprKind::Struct(structure) if !tree.contains_module(structure.module) => {
                        Some(format!("struct '{}' names unknown module", structure.name.value))
                    }
                    _ => None,
                });
            });
            if let Some(problem) = problem {
                bail!("module {}: {problem}", tree.module(entry.module).name);
            }
        }
        Ok(())
    }
}

/// Positions the analyzer requires to hold a block, plus the call a closure
/// is attached to.
fn shape_problem(expr: &Expr) -> Option<String> {
    let bodies: Vec<&Expr> = match &expr.kind {
        ExprKind::Module(module) => vec![&*module.body],
        ExprKind::Function(function) => vec![&*function.body],
        ExprKind::For(each) => vec![&*each.body],
        ExprKind::While(repeat) => vec![&*repeat.body],
        ExprKind::Try(attempt) => std::iter::once(&*attempt.body)
            .chain(attempt.catches.iter().map(|catch| &*catch.body))
            .collect(),
        ExprKind::Closure(closure) => {
            if closure.call.as_call().is_none() {
                return Some(format!(
                    "closure at {} is attached to a {}, expected a call",
                    expr.span,
                    closure.call.kind_name()
                ));
            }
            vec![&*closure.body]
        }
        _ => return None,
    };
    bodies.into_iter().find(|body| body.as_block().is_none()).map(|body| {
        format!(
            "{} at {} has a {} body, expected a block",
            expr.kind_name(),
            expr.span,
            body.kind_name()
        )
    })
}

#[cfg(test)]
mod unit_test;
