use std::collections::BTreeSet;

use tracing::trace;

use super::{
    Analyzer, ClosureFrame, Result, SemanticCategory,
    walker::{block_scope, node},
};
use crate::{
    ast::{CallExpr, ClosureExpr, ClosureId, Enclosing, Expr, ExprKind, VariableExpr},
    token::{Span, Token},
};

/// Prefix of the parameter names given to closures written as a bare
/// function reference (`map: str::upper`).
const SYNTHETIC_PARAMETER_PREFIX: char = '\'';

impl Analyzer<'_> {
    pub(super) fn visit_closure(
        &mut self,
        closure: ClosureExpr,
        span: Span,
        is_root: bool,
        piped: Option<Expr>,
    ) -> Result<Expr> {
        let ClosureExpr {
            call,
            parameters,
            body,
            captured,
            ..
        } = closure;

        // The call the closure is attached to is part of the surrounding
        // code, not of the closure body.
        let call = self.next_call_or_closure(*call, piped, true, true)?;
        if call.as_call().is_none() {
            panic!("closure attached to {}", call.kind_name());
        }

        let body_scope = block_scope(&body);
        let id = ClosureId(self.closures.len() as u32);
        self.closures.push(ClosureFrame {
            body_scope,
            parameters: parameters.iter().map(|p| p.value.clone()).collect(),
            captured,
            owner: self.enclosing,
        });
        for parameter in &parameters {
            self.tree.add_variable(body_scope, &parameter.value);
            self.push_token(parameter.span, SemanticCategory::Parameter);
        }

        let previous = self.enclosing;
        self.enclosing = Some(Enclosing::Closure(id));
        let body = self.next_block(body);
        self.enclosing = previous;
        let mut body = body?;

        if let Some(Enclosing::Closure(outer)) = self.enclosing {
            self.propagate_captures(id, outer);
        }

        let mut parameters = parameters;
        if let Some(synthetic) = self.rewrite_function_reference(id, &call, &mut body) {
            parameters = synthetic;
        }

        let captured = self.closure(id).captured.clone();
        trace!(target: "shale::analysis", closure = id.0, ?captured, "analysed closure");
        Ok(node(
            ExprKind::Closure(ClosureExpr {
                call: Box::new(call),
                parameters,
                body,
                captured,
                id: Some(id),
            }),
            span,
            is_root,
        ))
    }

    /// Hands captures of a nested closure up to the closure around it when
    /// the captured name lives outside that one as well.
    fn propagate_captures(&mut self, inner: ClosureId, outer: ClosureId) {
        let inner_frame = self.closure(inner);
        let outer_frame = self.closure(outer);
        let Some(inner_outside) = self.tree.scope(inner_frame.body_scope).parent else {
            return;
        };

        let additions: BTreeSet<String> = inner_frame
            .captured
            .iter()
            .filter(|name| {
                self.tree.has_variable(outer_frame.body_scope, name)
                    && !outer_frame.parameters.contains(name)
                    && !self.tree.has_declaration_of_variable(inner_frame.body_scope, name)
                    && !self.is_declared_between(name, inner_outside, outer_frame.body_scope)
            })
            .cloned()
            .collect();

        if !additions.is_empty() {
            trace!(target: "shale::analysis", from = inner.0, to = outer.0, ?additions, "propagated captures");
            self.closure_mut(outer).captured.extend(additions);
        }
    }

    /// A closure whose body is a single function reference is turned into an
    /// explicit call: `map: str::upper` becomes `map: ('0) => str::upper('0)`.
    ///
    /// Returns the synthetic parameters when the body was rewritten.
    fn rewrite_function_reference(&mut self, id: ClosureId, call: &Expr, body: &mut Expr) -> Option<Vec<Token>> {
        let body_scope = body.as_block()?.scope;
        let block = body.as_block_mut()?;
        if block.expressions.len() != 1 {
            return None;
        }
        let reference = block.expressions[0].as_call_mut().filter(|c| c.is_reference)?;
        let decorated = call.as_call()?;

        let parameters = self.synthetic_parameters(decorated, &reference.name);
        let mut implicit: Vec<Expr> = parameters
            .iter()
            .map(|parameter| Expr {
                kind: ExprKind::Variable(VariableExpr {
                    name: parameter.clone(),
                    scope: Some(body_scope),
                    is_captured: false,
                }),
                span: parameter.span,
                is_root: false,
                enclosing: Some(Enclosing::Closure(id)),
            })
            .collect();
        implicit.append(&mut reference.arguments);
        reference.arguments = implicit;
        reference.is_reference = false;

        for parameter in &parameters {
            self.tree.add_variable(body_scope, &parameter.value);
        }
        self.closure_mut(id).parameters = parameters.iter().map(|p| p.value.clone()).collect();
        trace!(target: "shale::analysis", closure = id.0, "expanded function reference");
        Some(parameters)
    }

    /// Names for the parameters of a rewritten reference, based on what the
    /// call the closure is attached to passes to its closure.
    fn synthetic_parameters(&self, decorated: &CallExpr, anchor: &Token) -> Vec<Token> {
        let named = |suffix: &str| anchor.with_value(format!("{SYNTHETIC_PARAMETER_PREFIX}{suffix}"));

        if let Some(count) = decorated.std_function.as_ref().and_then(|f| f.closure_parameter_count) {
            return (0..count).map(|i| named(&i.to_string())).collect();
        }
        if let Some(id) = decorated.function {
            return self
                .tree
                .function(id)
                .parameters
                .iter()
                .map(|p| named(&p.name.value))
                .collect();
        }
        vec![named("a")]
    }
}
