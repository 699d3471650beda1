use crate::{
    analysis::{AnalysisScope, Analyzer, Result},
    ast::{Ast, Expr, ExprKind},
    registry::{StdFunction, StdRegistry, StdStruct, StdType},
    scope::{ModuleId, ScopeId, ScopeTree},
};

/// Small stand-in for the standard library table.
pub struct FakeRegistry {
    functions: Vec<StdFunction>,
    structs: Vec<StdStruct>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            functions: vec![
                StdFunction::new("len", 1, 1),
                StdFunction::variadic("println", 0),
                StdFunction::new("map", 1, 1).with_closure(1),
                StdFunction::new("reduce", 2, 2).with_closure(2),
                StdFunction::new("lines", 1, 1).consuming_pipe(),
                StdFunction::new("time", 1, 1).starting_pipe_manually(),
                StdFunction::new("upper", 1, 1).in_module("str"),
                StdFunction::new("split", 1, 2).in_module("str"),
            ],
            structs: vec![StdStruct {
                name: "Duration".to_string(),
                module: "datetime".to_string(),
                min_argument_count: 0,
                max_argument_count: 2,
                variadic_start: None,
            }],
        }
    }
}

impl StdRegistry for FakeRegistry {
    fn function(&self, name: &str, module_path: &[String]) -> Option<StdFunction> {
        let module = match module_path {
            [] => None,
            [module] => Some(module.as_str()),
            _ => return None,
        };
        self.functions
            .iter()
            .find(|f| f.name == name && f.module.as_deref() == module)
            .cloned()
    }

    fn structure(&self, name: &str, module: &str) -> Option<StdStruct> {
        self.structs
            .iter()
            .find(|s| s.name == name && s.module == module)
            .cloned()
    }

    fn has_module(&self, module_path: &[String]) -> bool {
        matches!(module_path, [module] if ["str", "datetime"].contains(&module.as_str()))
    }

    fn runtime_type(&self, name: &str) -> Option<StdType> {
        ["Int", "String", "Error"]
            .contains(&name)
            .then(|| StdType { name: name.to_string() })
    }
}

pub struct Fixture {
    pub tree: ScopeTree,
    pub registry: FakeRegistry,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            tree: ScopeTree::new("main"),
            registry: FakeRegistry::new(),
        }
    }

    pub fn root(&self) -> ModuleId {
        self.tree.root()
    }

    pub fn root_scope(&self) -> ScopeId {
        self.tree.module(self.root()).scope
    }

    pub fn scope(&mut self, parent: ScopeId) -> ScopeId {
        self.tree.add_scope(parent)
    }

    pub fn analyze(&mut self, expressions: Vec<Expr>) -> Result<Ast> {
        let root = self.root();
        self.analyze_module(root, expressions)
    }

    pub fn analyze_module(&mut self, module: ModuleId, expressions: Vec<Expr>) -> Result<Ast> {
        Analyzer::analyze(
            &mut self.tree,
            &self.registry,
            Ast::new(expressions),
            module,
            AnalysisScope::OverwriteExistingModule,
        )
    }
}

pub fn nodes_of<'a>(ast: &'a Ast, kind: &str) -> Vec<&'a Expr> {
    ast.find_all(|expr| expr.kind_name() == kind)
}

pub fn call_named<'a>(ast: &'a Ast, name: &str) -> &'a crate::ast::CallExpr {
    ast.find_all(|expr| matches!(&expr.kind, ExprKind::Call(call) if call.name.value == name))
        .into_iter()
        .next()
        .and_then(|expr| expr.as_call())
        .unwrap_or_else(|| panic!("no call to {name}"))
}
