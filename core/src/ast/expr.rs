use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ops::{BinaryOp, UnaryOp};
use crate::{
    registry::{StdFunction, StdStruct},
    scope::{FunctionId, ModuleId, ScopeId, StructId},
    token::{Span, Token},
    val::{ConstValue, TypeDescriptor},
};

/// Handle to a closure analysed in the current run. Closures get their ids in
/// the order the analyzer enters them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosureId(pub u32);

/// Non-owning link from a node to the function or closure lexically around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Enclosing {
    Function(FunctionId),
    Closure(ClosureId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum AccessLevel {
    #[default]
    Private,
    Public,
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessLevel::Private => write!(f, "private"),
            AccessLevel::Public => write!(f, "public"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallType {
    BuiltInExec,
    BuiltInClosure,
    BuiltInCall,
    BuiltInSource,
    StdFunction,
    Function,
    Program,
}

impl CallType {
    /// Reserved call names. These can never be shadowed by user or std functions.
    pub fn builtin(name: &str) -> Option<CallType> {
        match name {
            "exec" => Some(CallType::BuiltInExec),
            "closure" => Some(CallType::BuiltInClosure),
            "call" => Some(CallType::BuiltInCall),
            "source" => Some(CallType::BuiltInSource),
            _ => None,
        }
    }

    pub fn is_builtin(self) -> bool {
        matches!(
            self,
            CallType::BuiltInExec | CallType::BuiltInClosure | CallType::BuiltInCall | CallType::BuiltInSource
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallStyle {
    #[default]
    Parenthesized,
    TextArguments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedirectionKind {
    #[default]
    None,
    Output,
    Error,
    All,
}

/// What kind of construct a block is the body of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StructureKind {
    #[default]
    Other,
    Module,
    Function,
    Closure,
    Loop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Token,
    #[serde(default)]
    pub default_value: Option<Box<Expr>>,
    #[serde(default)]
    pub is_variadic: bool,
}

impl Parameter {
    pub fn new(name: Token) -> Self {
        Self {
            name,
            default_value: None,
            is_variadic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(default)]
    pub span: Span,
    /// The value of a root expression is discarded.
    #[serde(default)]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing: Option<Enclosing>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            is_root: false,
            enclosing: None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockExpr> {
        match &self.kind {
            ExprKind::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut BlockExpr> {
        match &mut self.kind {
            ExprKind::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_call_mut(&mut self) -> Option<&mut CallExpr> {
        match &mut self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_closure(&self) -> Option<&ClosureExpr> {
        match &self.kind {
            ExprKind::Closure(closure) => Some(closure),
            _ => None,
        }
    }

    /// True for a call that will run an external executable (or has not been
    /// classified yet).
    pub fn is_program_call(&self) -> bool {
        matches!(
            &self.kind,
            ExprKind::Call(CallExpr {
                call_type: None | Some(CallType::Program),
                ..
            })
        )
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Module(_) => "module",
            ExprKind::Struct(_) => "struct",
            ExprKind::Function(_) => "function",
            ExprKind::Let(_) => "let",
            ExprKind::Construct(_) => "new",
            ExprKind::If(_) => "if",
            ExprKind::For(_) => "for",
            ExprKind::While(_) => "while",
            ExprKind::Tuple(_) => "tuple",
            ExprKind::List(_) => "list",
            ExprKind::Set(_) => "set",
            ExprKind::Dictionary(_) => "dictionary",
            ExprKind::Block(_) => "block",
            ExprKind::Keyword(_) => "keyword",
            ExprKind::Binary(_) => "binary",
            ExprKind::Unary(_) => "unary",
            ExprKind::FieldAccess(_) => "field access",
            ExprKind::Range(_) => "range",
            ExprKind::Indexer(_) => "indexer",
            ExprKind::TypeRef(_) => "type",
            ExprKind::Variable(_) => "variable",
            ExprKind::Call(_) => "call",
            ExprKind::Literal(_) => "literal",
            ExprKind::StringInterpolation(_) => "string interpolation",
            ExprKind::Closure(_) => "closure",
            ExprKind::Try(_) => "try",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Module(ModuleExpr),
    Struct(StructExpr),
    Function(FunctionExpr),
    Let(LetExpr),
    Construct(ConstructExpr),
    If(IfExpr),
    For(ForExpr),
    While(WhileExpr),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Set(Vec<Expr>),
    Dictionary(Vec<(Expr, Expr)>),
    Block(BlockExpr),
    Keyword(KeywordExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    FieldAccess(FieldAccessExpr),
    Range(RangeExpr),
    Indexer(IndexerExpr),
    TypeRef(TypeRefExpr),
    Variable(VariableExpr),
    Call(CallExpr),
    Literal(LiteralExpr),
    StringInterpolation(Vec<Expr>),
    Closure(ClosureExpr),
    Try(TryExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleExpr {
    pub access: AccessLevel,
    pub name: Token,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructExpr {
    pub access: AccessLevel,
    pub name: Token,
    pub parameters: Vec<Parameter>,
    pub module: ModuleId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpr {
    pub access: AccessLevel,
    pub name: Token,
    pub parameters: Vec<Parameter>,
    pub body: Box<Expr>,
    pub module: ModuleId,
    /// Declared with closure support (`fn f() => closure`)
    #[serde(default)]
    pub has_closure: bool,
    pub id: FunctionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetExpr {
    pub identifiers: Vec<Token>,
    pub value: Box<Expr>,
    #[serde(default)]
    pub scope: Option<ScopeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructRef {
    User(StructId),
    Std(StdStruct),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructExpr {
    pub name: Token,
    #[serde(default)]
    pub module_path: Vec<Token>,
    #[serde(default)]
    pub arguments: Vec<Expr>,
    #[serde(default)]
    pub symbol: Option<StructRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_branch: Box<Expr>,
    #[serde(default)]
    pub else_branch: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForExpr {
    pub identifiers: Vec<Token>,
    pub value: Box<Expr>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileExpr {
    pub condition: Box<Expr>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockExpr {
    pub expressions: Vec<Expr>,
    #[serde(default)]
    pub parent_kind: StructureKind,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordExpr {
    pub keyword: Token,
    #[serde(default)]
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccessExpr {
    pub object: Box<Expr>,
    pub field: Token,
    /// Field name as a string constant
    #[serde(default)]
    pub field_value: Option<ConstValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeExpr {
    #[serde(default)]
    pub from: Option<Box<Expr>>,
    #[serde(default)]
    pub to: Option<Box<Expr>>,
    #[serde(default)]
    pub inclusive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerExpr {
    pub value: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRefExpr {
    pub name: Token,
    #[serde(default)]
    pub resolved: Option<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableExpr {
    pub name: Token,
    #[serde(default)]
    pub scope: Option<ScopeId>,
    #[serde(default)]
    pub is_captured: bool,
}

impl VariableExpr {
    pub fn is_environment_variable(&self) -> bool {
        self.name.value.starts_with(ENVIRONMENT_SIGIL)
    }
}

/// Identifiers starting with this character are resolved at runtime from the
/// process environment.
pub const ENVIRONMENT_SIGIL: char = '$';

fn automatic_start_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub name: Token,
    #[serde(default)]
    pub module_path: Vec<Token>,
    #[serde(default)]
    pub arguments: Vec<Expr>,
    #[serde(default)]
    pub style: CallStyle,
    #[serde(default)]
    pub call_type: Option<CallType>,
    #[serde(default)]
    pub std_function: Option<StdFunction>,
    #[serde(default)]
    pub function: Option<FunctionId>,
    /// Left side of a pipe whose output is streamed into this program's stdin
    #[serde(default)]
    pub piped_to_program: Option<Box<Expr>>,
    #[serde(default)]
    pub redirection: RedirectionKind,
    #[serde(default)]
    pub disable_redirection_buffering: bool,
    #[serde(default = "automatic_start_default")]
    pub automatic_start: bool,
    /// Written without arguments to stand for the function itself
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default)]
    pub environment_variables: Vec<(String, Expr)>,
    /// Function whose closure a `closure(...)` call invokes
    #[serde(default)]
    pub closure_provider: Option<FunctionId>,
    #[serde(default)]
    pub scope: Option<ScopeId>,
}

impl CallExpr {
    pub fn new(name: Token, module_path: Vec<Token>, arguments: Vec<Expr>) -> Self {
        Self {
            name,
            module_path,
            arguments,
            style: CallStyle::Parenthesized,
            call_type: None,
            std_function: None,
            function: None,
            piped_to_program: None,
            redirection: RedirectionKind::None,
            disable_redirection_buffering: false,
            automatic_start: true,
            is_reference: false,
            environment_variables: Vec::new(),
            closure_provider: None,
            scope: None,
        }
    }

    pub fn module_path_names(&self) -> Vec<String> {
        self.module_path.iter().map(|t| t.value.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub token: Token,
    #[serde(default)]
    pub value: Option<ConstValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureExpr {
    /// The call this closure is attached to
    pub call: Box<Expr>,
    #[serde(default)]
    pub parameters: Vec<Token>,
    pub body: Box<Expr>,
    #[serde(default)]
    pub captured: BTreeSet<String>,
    #[serde(default)]
    pub id: Option<ClosureId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryExpr {
    pub body: Box<Expr>,
    #[serde(default)]
    pub catches: Vec<CatchClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub identifier: Option<Token>,
    #[serde(default)]
    pub type_ref: Option<Box<Expr>>,
    pub body: Box<Expr>,
}
