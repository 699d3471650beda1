use super::{Expr, ExprKind};

impl Expr {
    /// Calls `f` on each direct child, in source order.
    pub fn for_each_child<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        match &self.kind {
            ExprKind::Module(module) => f(&module.body),
            ExprKind::Struct(st) => {
                for param in &st.parameters {
                    if let Some(default) = &param.default_value {
                        f(default);
                    }
                }
            }
            ExprKind::Function(func) => {
                for param in &func.parameters {
                    if let Some(default) = &param.default_value {
                        f(default);
                    }
                }
                f(&func.body);
            }
            ExprKind::Let(let_expr) => f(&let_expr.value),
            ExprKind::Construct(construct) => construct.arguments.iter().for_each(f),
            ExprKind::If(if_expr) => {
                f(&if_expr.condition);
                f(&if_expr.then_branch);
                if let Some(else_branch) = &if_expr.else_branch {
                    f(else_branch);
                }
            }
            ExprKind::For(for_expr) => {
                f(&for_expr.value);
                f(&for_expr.body);
            }
            ExprKind::While(while_expr) => {
                f(&while_expr.condition);
                f(&while_expr.body);
            }
            ExprKind::Tuple(values)
            | ExprKind::List(values)
            | ExprKind::Set(values)
            | ExprKind::StringInterpolation(values) => values.iter().for_each(f),
            ExprKind::Dictionary(entries) => {
                for (key, value) in entries {
                    f(key);
                    f(value);
                }
            }
            ExprKind::Block(block) => block.expressions.iter().for_each(f),
            ExprKind::Keyword(keyword) => {
                if let Some(value) = &keyword.value {
                    f(value);
                }
            }
            ExprKind::Binary(binary) => {
                f(&binary.left);
                f(&binary.right);
            }
            ExprKind::Unary(unary) => f(&unary.value),
            ExprKind::FieldAccess(access) => f(&access.object),
            ExprKind::Range(range) => {
                if let Some(from) = &range.from {
                    f(from);
                }
                if let Some(to) = &range.to {
                    f(to);
                }
            }
            ExprKind::Indexer(indexer) => {
                f(&indexer.value);
                f(&indexer.index);
            }
            ExprKind::TypeRef(_) | ExprKind::Variable(_) | ExprKind::Literal(_) => {}
            ExprKind::Call(call) => {
                if let Some(piped) = &call.piped_to_program {
                    f(piped);
                }
                call.arguments.iter().for_each(&mut *f);
                for (_, value) in &call.environment_variables {
                    f(value);
                }
            }
            ExprKind::Closure(closure) => {
                f(&closure.call);
                f(&closure.body);
            }
            ExprKind::Try(try_expr) => {
                f(&try_expr.body);
                for catch in &try_expr.catches {
                    if let Some(type_ref) = &catch.type_ref {
                        f(type_ref);
                    }
                    f(&catch.body);
                }
            }
        }
    }

    /// Pre-order walk over this node and all its descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        self.for_each_child(&mut |child| child.walk(f));
    }
}
