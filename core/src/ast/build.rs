//! Helpers for assembling trees by hand.
//!
//! Mirrors what the parser produces: scopes have to exist in the
//! [`ScopeTree`] before the blocks that own them are built, and functions and
//! structs are built from the signatures the pre-pass declared.

use super::{
    AccessLevel, BinaryExpr, BinaryOp, BlockExpr, CallExpr, CallStyle, CatchClause, ClosureExpr, ConstructExpr, Expr,
    ExprKind, FieldAccessExpr, ForExpr, FunctionExpr, IfExpr, IndexerExpr, KeywordExpr, LetExpr, LiteralExpr,
    ModuleExpr, Parameter, RangeExpr, StructExpr, StructureKind, TryExpr, TypeRefExpr, UnaryExpr, UnaryOp,
    VariableExpr, WhileExpr,
};
use crate::{
    scope::{FunctionId, ScopeId, ScopeTree, StructId},
    token::{Position, Span, Token, TokenKind},
};

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::default())
}

pub fn ident(name: &str) -> Token {
    Token::identifier(name, Span::default())
}

/// Places `expr` on `line`, spanning `width` columns from `column`.
pub fn at(mut expr: Expr, line: u32, column: u32, width: u32) -> Expr {
    let start = Position::new(line, column, 0);
    let end = Position::new(line, column + width, 0);
    expr.span = Span::new(start, end);
    expr
}

pub fn param(name: &str) -> Parameter {
    Parameter::new(ident(name))
}

pub fn default_param(name: &str, value: Expr) -> Parameter {
    Parameter {
        default_value: Some(Box::new(value)),
        ..param(name)
    }
}

pub fn variadic_param(name: &str) -> Parameter {
    Parameter {
        is_variadic: true,
        ..param(name)
    }
}

pub fn literal(kind: TokenKind, value: &str) -> Expr {
    expr(ExprKind::Literal(LiteralExpr {
        token: Token::new(kind, value, Span::default()),
        value: None,
    }))
}

pub fn int(value: &str) -> Expr {
    literal(TokenKind::IntegerLiteral, value)
}

pub fn float(value: &str) -> Expr {
    literal(TokenKind::FloatLiteral, value)
}

pub fn string(value: &str) -> Expr {
    literal(TokenKind::DoubleQuoteStringLiteral, value)
}

pub fn text(value: &str) -> Expr {
    literal(TokenKind::TextArgumentStringLiteral, value)
}

pub fn nil() -> Expr {
    literal(TokenKind::Nil, "nil")
}

pub fn var(name: &str) -> Expr {
    expr(ExprKind::Variable(VariableExpr {
        name: ident(name),
        scope: None,
        is_captured: false,
    }))
}

pub fn call(name: &str, arguments: Vec<Expr>) -> Expr {
    path_call(&[], name, arguments)
}

/// `a::b::name(arguments)`
pub fn path_call(path: &[&str], name: &str, arguments: Vec<Expr>) -> Expr {
    let path = path.iter().map(|segment| ident(segment)).collect();
    expr(ExprKind::Call(CallExpr::new(ident(name), path, arguments)))
}

/// `name arg arg`, the shell-like call style.
pub fn command(name: &str, arguments: &[&str]) -> Expr {
    let mut call = CallExpr::new(ident(name), Vec::new(), arguments.iter().map(|a| text(a)).collect());
    call.style = CallStyle::TextArguments;
    expr(ExprKind::Call(call))
}

/// A function name used as a value, e.g. in `map: str::upper`.
pub fn reference(path: &[&str], name: &str) -> Expr {
    let mut reference = path_call(path, name, Vec::new());
    if let Some(call) = reference.as_call_mut() {
        call.is_reference = true;
    }
    reference
}

pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    expr(ExprKind::Binary(BinaryExpr {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }))
}

pub fn pipe(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Pipe, right)
}

pub fn assign(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Equals, right)
}

pub fn not(value: Expr) -> Expr {
    expr(ExprKind::Unary(UnaryExpr {
        op: UnaryOp::Not,
        value: Box::new(value),
    }))
}

pub fn list(values: Vec<Expr>) -> Expr {
    expr(ExprKind::List(values))
}

pub fn dictionary(entries: Vec<(Expr, Expr)>) -> Expr {
    expr(ExprKind::Dictionary(entries))
}

pub fn interpolation(parts: Vec<Expr>) -> Expr {
    expr(ExprKind::StringInterpolation(parts))
}

pub fn field(object: Expr, name: &str) -> Expr {
    expr(ExprKind::FieldAccess(FieldAccessExpr {
        object: Box::new(object),
        field: ident(name),
        field_value: None,
    }))
}

pub fn index(value: Expr, index: Expr) -> Expr {
    expr(ExprKind::Indexer(IndexerExpr {
        value: Box::new(value),
        index: Box::new(index),
    }))
}

pub fn range(from: Expr, to: Expr) -> Expr {
    expr(ExprKind::Range(RangeExpr {
        from: Some(Box::new(from)),
        to: Some(Box::new(to)),
        inclusive: false,
    }))
}

pub fn type_ref(name: &str) -> Expr {
    expr(ExprKind::TypeRef(TypeRefExpr {
        name: ident(name),
        resolved: None,
    }))
}

pub fn construct(path: &[&str], name: &str, arguments: Vec<Expr>) -> Expr {
    expr(ExprKind::Construct(ConstructExpr {
        name: ident(name),
        module_path: path.iter().map(|segment| ident(segment)).collect(),
        arguments,
        symbol: None,
    }))
}

pub fn keyword(kind: TokenKind, value: Option<Expr>) -> Expr {
    let text = match kind {
        TokenKind::Return => "return",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        _ => "throw",
    };
    expr(ExprKind::Keyword(KeywordExpr {
        keyword: Token::new(kind, text, Span::default()),
        value: value.map(Box::new),
    }))
}

pub fn let_binding(names: &[&str], value: Expr) -> Expr {
    expr(ExprKind::Let(LetExpr {
        identifiers: names.iter().map(|name| ident(name)).collect(),
        value: Box::new(value),
        scope: None,
    }))
}

pub fn block(scope: ScopeId, expressions: Vec<Expr>) -> Expr {
    block_of(StructureKind::Other, scope, expressions)
}

pub fn block_of(parent_kind: StructureKind, scope: ScopeId, expressions: Vec<Expr>) -> Expr {
    expr(ExprKind::Block(BlockExpr {
        expressions,
        parent_kind,
        scope,
    }))
}

pub fn if_else(condition: Expr, then_branch: Expr, else_branch: Option<Expr>) -> Expr {
    expr(ExprKind::If(IfExpr {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
    }))
}

pub fn for_each(names: &[&str], value: Expr, body: Expr) -> Expr {
    expr(ExprKind::For(ForExpr {
        identifiers: names.iter().map(|name| ident(name)).collect(),
        value: Box::new(value),
        body: Box::new(body),
    }))
}

pub fn while_loop(condition: Expr, body: Expr) -> Expr {
    expr(ExprKind::While(WhileExpr {
        condition: Box::new(condition),
        body: Box::new(body),
    }))
}

/// `call: (parameters) => body`
pub fn closure(call: Expr, parameters: &[&str], body: Expr) -> Expr {
    expr(ExprKind::Closure(ClosureExpr {
        call: Box::new(call),
        parameters: parameters.iter().map(|name| ident(name)).collect(),
        body: Box::new(body),
        captured: Default::default(),
        id: None,
    }))
}

pub fn try_catch(body: Expr, identifier: Option<&str>, catch_body: Expr) -> Expr {
    expr(ExprKind::Try(TryExpr {
        body: Box::new(body),
        catches: vec![CatchClause {
            identifier: identifier.map(ident),
            type_ref: None,
            body: Box::new(catch_body),
        }],
    }))
}

pub fn module(access: AccessLevel, name: &str, body: Expr) -> Expr {
    expr(ExprKind::Module(ModuleExpr {
        access,
        name: ident(name),
        body: Box::new(body),
    }))
}

/// Declaration node for a function the pre-pass declared as `id`.
pub fn function(tree: &ScopeTree, id: FunctionId, body: Expr) -> Expr {
    let symbol = tree.function(id);
    expr(ExprKind::Function(FunctionExpr {
        access: symbol.access,
        name: ident(&symbol.name),
        parameters: symbol.parameters.clone(),
        body: Box::new(body),
        module: symbol.module,
        has_closure: symbol.has_closure,
        id,
    }))
}

/// Declaration node for a struct the pre-pass declared as `id`.
pub fn structure(tree: &ScopeTree, id: StructId) -> Expr {
    let symbol = tree.structure(id);
    expr(ExprKind::Struct(StructExpr {
        access: symbol.access,
        name: ident(&symbol.name),
        parameters: symbol.parameters.clone(),
        module: symbol.module,
    }))
}
