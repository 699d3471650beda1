use tracing::trace;

use super::{AnalysisError, AnalysisErrorKind, Analyzer, Result, SemanticCategory, err};
use crate::{
    ast::{
        BinaryExpr, BinaryOp, BlockExpr, CatchClause, Enclosing, Expr, ExprKind, FieldAccessExpr, ForExpr, FunctionExpr, IfExpr,
        IndexerExpr, KeywordExpr, LetExpr, ModuleExpr, RangeExpr, StructExpr, TryExpr, TypeRefExpr, UnaryExpr,
        ENVIRONMENT_SIGIL, WhileExpr,
    },
    scope::{AnalysisStatus, CLOSURE_CARRIER, FunctionSymbol, ScopeId, StructSymbol},
    token::Span,
    val::{ConstValue, TypeDescriptor},
};

/// Builds an analysed node. The enclosing link is filled in by [`Analyzer::next`].
pub(super) fn node(kind: ExprKind, span: Span, is_root: bool) -> Expr {
    Expr {
        kind,
        span,
        is_root,
        enclosing: None,
    }
}

/// Scope of a block node. Anything else in block position means the tree was
/// built wrong.
pub(super) fn block_scope(expr: &Expr) -> ScopeId {
    match expr.as_block() {
        Some(block) => block.scope,
        None => panic!("expected a block, found {}", expr.kind_name()),
    }
}

impl Analyzer<'_> {
    /// Analyses one node and returns its replacement.
    ///
    /// The node is stamped with the current enclosing function or closure
    /// before dispatch and the stamp is carried over to the replacement. An
    /// error without a position gets the span of this node.
    pub(super) fn next(&mut self, mut expr: Expr) -> Result<Expr> {
        expr.enclosing = self.enclosing;
        let enclosing = expr.enclosing;
        let span = expr.span;

        let mut analysed = self.dispatch(expr).map_err(|e| e.or_span(span))?;
        analysed.enclosing = enclosing;
        Ok(analysed)
    }

    pub(super) fn next_boxed(&mut self, expr: Box<Expr>) -> Result<Box<Expr>> {
        self.next(*expr).map(Box::new)
    }

    pub(super) fn next_block(&mut self, expr: Box<Expr>) -> Result<Box<Expr>> {
        block_scope(&expr);
        self.next_boxed(expr)
    }

    fn next_all(&mut self, expressions: Vec<Expr>) -> Result<Vec<Expr>> {
        expressions.into_iter().map(|e| self.next(e)).collect()
    }

    /// Analyses the right side of a pipe, or the call a closure is attached
    /// to. Only calls and closures are accepted there.
    pub(super) fn next_call_or_closure(
        &mut self,
        mut expr: Expr,
        piped: Option<Expr>,
        has_closure: bool,
        validate: bool,
    ) -> Result<Expr> {
        expr.enclosing = self.enclosing;
        let enclosing = expr.enclosing;
        let Expr { kind, span, is_root, .. } = expr;

        let result = match kind {
            ExprKind::Call(call) => self.visit_call(call, span, is_root, piped, has_closure, validate),
            ExprKind::Closure(closure) => self.visit_closure(closure, span, is_root, piped),
            _ => err(AnalysisErrorKind::ExpectedCallAfterPipe),
        };

        let mut analysed = result.map_err(|e| e.or_span(span))?;
        analysed.enclosing = enclosing;
        Ok(analysed)
    }

    fn dispatch(&mut self, expr: Expr) -> Result<Expr> {
        let Expr { kind, span, is_root, .. } = expr;
        match kind {
            ExprKind::Module(module) => self.visit_module(module, span, is_root),
            ExprKind::Struct(structure) => self.visit_struct(structure, span, is_root),
            ExprKind::Function(function) => self.visit_function(function, span, is_root),
            ExprKind::Let(binding) => self.visit_let(binding, span, is_root),
            ExprKind::Construct(construct) => self.visit_construct(construct, span, is_root),
            ExprKind::If(branch) => self.visit_if(branch, span, is_root),
            ExprKind::For(each) => self.visit_for(each, span, is_root),
            ExprKind::While(repeat) => self.visit_while(repeat, span, is_root),
            ExprKind::Tuple(values) => Ok(node(ExprKind::Tuple(self.next_all(values)?), span, is_root)),
            ExprKind::List(values) => Ok(node(ExprKind::List(self.next_all(values)?), span, is_root)),
            ExprKind::Set(values) => Ok(node(ExprKind::Set(self.next_all(values)?), span, is_root)),
            ExprKind::Dictionary(entries) => {
                let mut analysed = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    analysed.push((self.next(key)?, self.next(value)?));
                }
                Ok(node(ExprKind::Dictionary(analysed), span, is_root))
            }
            ExprKind::Block(block) => self.visit_block(block, span, is_root),
            ExprKind::Keyword(keyword) => self.visit_keyword(keyword, span, is_root),
            ExprKind::Binary(binary) => self.visit_binary(binary, span, is_root),
            ExprKind::Unary(UnaryExpr { op, value }) => {
                let value = self.next_boxed(value)?;
                Ok(node(ExprKind::Unary(UnaryExpr { op, value }), span, is_root))
            }
            ExprKind::FieldAccess(access) => self.visit_field_access(access, span, is_root),
            ExprKind::Range(RangeExpr { from, to, inclusive }) => {
                let from = from.map(|e| self.next_boxed(e)).transpose()?;
                let to = to.map(|e| self.next_boxed(e)).transpose()?;
                Ok(node(ExprKind::Range(RangeExpr { from, to, inclusive }), span, is_root))
            }
            ExprKind::Indexer(IndexerExpr { value, index }) => {
                let value = self.next_boxed(value)?;
                let index = self.next_boxed(index)?;
                Ok(node(ExprKind::Indexer(IndexerExpr { value, index }), span, is_root))
            }
            ExprKind::TypeRef(type_ref) => self.visit_type_ref(type_ref, span, is_root),
            ExprKind::Variable(variable) => self.visit_variable(variable, span, is_root),
            ExprKind::Call(call) => self.visit_call(call, span, is_root, None, false, true),
            ExprKind::Literal(literal) => self.visit_literal(literal, span, is_root),
            ExprKind::StringInterpolation(parts) => Ok(node(
                ExprKind::StringInterpolation(self.next_all(parts)?),
                span,
                is_root,
            )),
            ExprKind::Closure(closure) => self.visit_closure(closure, span, is_root, None),
            ExprKind::Try(attempt) => self.visit_try(attempt, span, is_root),
        }
    }

    fn visit_module(&mut self, module: ModuleExpr, span: Span, is_root: bool) -> Result<Expr> {
        let ModuleExpr { access, name, mut body } = module;
        self.push_token(name.span, SemanticCategory::Module);

        body.is_root = true;
        let body = self.next_block(body)?;
        Ok(node(ExprKind::Module(ModuleExpr { access, name, body }), span, is_root))
    }

    fn visit_struct(&mut self, structure: StructExpr, span: Span, is_root: bool) -> Result<Expr> {
        let StructExpr {
            access,
            name,
            parameters,
            module,
        } = structure;
        self.push_token(name.span, SemanticCategory::Struct);

        let parameters = self.analyze_parameters(parameters)?;
        for (i, field) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.name.value == field.name.value) {
                return Err(AnalysisError::with_span(
                    AnalysisErrorKind::DuplicateStructField {
                        name: name.value.clone(),
                        field: field.name.value.clone(),
                    },
                    field.name.span,
                ));
            }
        }

        self.tree.register_struct(StructSymbol {
            name: name.value.clone(),
            access,
            module,
            parameters: parameters.clone(),
        });
        trace!(target: "shale::analysis", name = %name.value, "registered struct");

        Ok(node(
            ExprKind::Struct(StructExpr {
                access,
                name,
                parameters,
                module,
            }),
            span,
            is_root,
        ))
    }

    fn visit_function(&mut self, function: FunctionExpr, span: Span, is_root: bool) -> Result<Expr> {
        // Functions reached a second time (e.g. through a stored tree) keep
        // the result of their first analysis.
        if self.tree.function(function.id).status != AnalysisStatus::None {
            return Ok(node(ExprKind::Function(function), span, is_root));
        }

        let FunctionExpr {
            access,
            name,
            parameters,
            body,
            module,
            has_closure,
            id,
        } = function;
        self.push_token(name.span, SemanticCategory::Function);
        self.closure_support.insert(id, has_closure);

        let previous_enclosing = self.enclosing;
        let previous_scope = self.scope;
        let result = self.analyze_parameters(parameters).and_then(|parameters| {
            let body_scope = block_scope(&body);
            for parameter in &parameters {
                self.tree.add_variable(body_scope, &parameter.name.value);
            }
            if has_closure {
                self.tree.add_variable(body_scope, CLOSURE_CARRIER);
            }

            self.enclosing = Some(Enclosing::Function(id));
            self.scope = self.tree.module(module).scope;
            let body = self.next_block(body);
            self.enclosing = previous_enclosing;
            self.scope = previous_scope;
            Ok((parameters, body?))
        });

        let (parameters, body) = match result {
            Ok(analysed) => analysed,
            Err(error) => {
                self.tree.function_mut(id).status = AnalysisStatus::Failed;
                return Err(error);
            }
        };

        self.tree.register_function(
            id,
            FunctionSymbol {
                name: name.value.clone(),
                access,
                module,
                parameters: parameters.clone(),
                has_closure,
                closure_captured: self.captured_carriers.contains(&id),
                status: AnalysisStatus::Analysed,
            },
        );
        trace!(target: "shale::analysis", name = %name.value, "registered function");

        Ok(node(
            ExprKind::Function(FunctionExpr {
                access,
                name,
                parameters,
                body,
                module,
                has_closure,
                id,
            }),
            span,
            is_root,
        ))
    }

    fn visit_let(&mut self, binding: LetExpr, span: Span, is_root: bool) -> Result<Expr> {
        let LetExpr { identifiers, value, .. } = binding;
        if identifiers.len() > 1 && identifiers.iter().any(|id| id.value.starts_with(ENVIRONMENT_SIGIL)) {
            return err(AnalysisErrorKind::EnvironmentDestructure);
        }

        let value = self.next_boxed(value)?;
        for identifier in &identifiers {
            if identifier.value.starts_with(ENVIRONMENT_SIGIL) {
                self.push_token(identifier.span, SemanticCategory::EnvironmentVariable);
            } else {
                self.tree.add_variable(self.scope, &identifier.value);
                self.push_token(identifier.span, SemanticCategory::Variable);
            }
        }

        Ok(node(
            ExprKind::Let(LetExpr {
                identifiers,
                value,
                scope: Some(self.scope),
            }),
            span,
            is_root,
        ))
    }

    fn visit_if(&mut self, branch: IfExpr, span: Span, is_root: bool) -> Result<Expr> {
        let IfExpr {
            condition,
            mut then_branch,
            else_branch,
        } = branch;
        let condition = self.next_boxed(condition)?;
        then_branch.is_root = is_root;
        let then_branch = self.next_boxed(then_branch)?;
        let else_branch = match else_branch {
            Some(mut other) => {
                other.is_root = is_root;
                Some(self.next_boxed(other)?)
            }
            None => None,
        };

        Ok(node(
            ExprKind::If(IfExpr {
                condition,
                then_branch,
                else_branch,
            }),
            span,
            is_root,
        ))
    }

    fn visit_for(&mut self, each: ForExpr, span: Span, is_root: bool) -> Result<Expr> {
        let ForExpr {
            identifiers,
            value,
            mut body,
        } = each;
        let value = self.next_boxed(value)?;

        let body_scope = block_scope(&body);
        for identifier in &identifiers {
            self.tree.add_variable(body_scope, &identifier.value);
            self.push_token(identifier.span, SemanticCategory::Variable);
        }

        body.is_root = true;
        let body = self.next_block(body)?;
        Ok(node(
            ExprKind::For(ForExpr {
                identifiers,
                value,
                body,
            }),
            span,
            is_root,
        ))
    }

    fn visit_while(&mut self, repeat: WhileExpr, span: Span, is_root: bool) -> Result<Expr> {
        let WhileExpr { condition, mut body } = repeat;
        let condition = self.next_boxed(condition)?;
        body.is_root = true;
        let body = self.next_block(body)?;
        Ok(node(ExprKind::While(WhileExpr { condition, body }), span, is_root))
    }

    fn visit_block(&mut self, block: BlockExpr, span: Span, is_root: bool) -> Result<Expr> {
        let BlockExpr {
            expressions,
            parent_kind,
            scope,
        } = block;

        let previous = self.scope;
        self.scope = scope;
        let result: Result<Vec<Expr>> = expressions
            .into_iter()
            .map(|mut expr| {
                if is_root {
                    expr.is_root = true;
                }
                self.next(expr)
            })
            .collect();
        self.scope = previous;

        Ok(node(
            ExprKind::Block(BlockExpr {
                expressions: result?,
                parent_kind,
                scope,
            }),
            span,
            is_root,
        ))
    }

    fn visit_keyword(&mut self, keyword: KeywordExpr, span: Span, is_root: bool) -> Result<Expr> {
        let KeywordExpr { keyword, value } = keyword;
        self.push_token(keyword.span, SemanticCategory::Keyword);
        let value = value.map(|v| self.next_boxed(v)).transpose()?;
        Ok(node(ExprKind::Keyword(KeywordExpr { keyword, value }), span, is_root))
    }

    fn visit_binary(&mut self, binary: BinaryExpr, span: Span, is_root: bool) -> Result<Expr> {
        if binary.op.is_pipe() {
            return self.visit_pipe(binary, is_root);
        }
        if binary.op == BinaryOp::Equals {
            return self.visit_assignment(binary, span, is_root);
        }

        let BinaryExpr { mut left, op, right } = binary;
        if op.is_non_redirecting() {
            // In `a && b && c` the operands are run for their exit status,
            // their output is never collected.
            left.is_root = true;
            if let ExprKind::Binary(inner) = &mut left.kind
                && inner.op.is_non_redirecting()
            {
                inner.right.is_root = true;
            }
        }

        let left = self.next_boxed(left)?;
        let right = self.next_boxed(right)?;
        Ok(node(ExprKind::Binary(BinaryExpr { left, op, right }), span, is_root))
    }

    fn visit_field_access(&mut self, access: FieldAccessExpr, span: Span, is_root: bool) -> Result<Expr> {
        let FieldAccessExpr { object, field, .. } = access;
        let object = self.next_boxed(object)?;
        self.push_token(field.span, SemanticCategory::Property);
        let field_value = Some(ConstValue::string(field.value.clone()));
        Ok(node(
            ExprKind::FieldAccess(FieldAccessExpr {
                object,
                field,
                field_value,
            }),
            span,
            is_root,
        ))
    }

    fn visit_type_ref(&mut self, type_ref: TypeRefExpr, span: Span, is_root: bool) -> Result<Expr> {
        let name = type_ref.name;
        let resolved = if let Some(std_type) = self.registry.runtime_type(&name.value) {
            TypeDescriptor::Std(std_type)
        } else if let Some(id) = self.tree.find_struct(self.current_module(), &name.value, true) {
            TypeDescriptor::Struct(id)
        } else {
            return err(AnalysisErrorKind::NotFound { name: name.value });
        };

        self.push_token(name.span, SemanticCategory::Type);
        Ok(node(
            ExprKind::TypeRef(TypeRefExpr {
                name,
                resolved: Some(resolved),
            }),
            span,
            is_root,
        ))
    }

    fn visit_try(&mut self, attempt: TryExpr, span: Span, is_root: bool) -> Result<Expr> {
        let TryExpr { mut body, catches } = attempt;
        body.is_root = is_root;
        let body = self.next_block(body)?;

        let mut analysed = Vec::with_capacity(catches.len());
        for CatchClause {
            identifier,
            type_ref,
            mut body,
        } in catches
        {
            let type_ref = type_ref.map(|t| self.next_boxed(t)).transpose()?;
            if let Some(identifier) = &identifier {
                self.tree.add_variable(block_scope(&body), &identifier.value);
                self.push_token(identifier.span, SemanticCategory::Variable);
            }
            body.is_root = is_root;
            let body = self.next_block(body)?;
            analysed.push(CatchClause {
                identifier,
                type_ref,
                body,
            });
        }

        Ok(node(
            ExprKind::Try(TryExpr {
                body,
                catches: analysed,
            }),
            span,
            is_root,
        ))
    }
}
