use super::*;
use crate::{
    ast::{AccessLevel, build::*},
    scope::ScopeId,
};

fn sample() -> Unit {
    let mut scopes = ScopeTree::new("main");
    let root = scopes.root();
    let root_scope = scopes.module(root).scope;
    let id = scopes.declare_function(root, "greet", AccessLevel::Public, vec![param("who")], false);
    let body = scopes.add_scope(root_scope);
    let ast = Ast::new(vec![
        function(&scopes, id, block(body, vec![command("echo", &["hi"])])),
        call("greet", vec![string("x")]),
    ]);
    Unit {
        scopes,
        modules: vec![UnitModule { module: root, ast }],
    }
}

#[test]
fn test_unit_survives_json() {
    let unit = sample();
    let json = unit.to_json_pretty().unwrap();
    let parsed = Unit::from_json(&json).unwrap();
    assert_eq!(parsed, unit);
}

#[test]
fn test_unknown_scope_is_rejected() {
    let mut unit = sample();
    unit.modules[0]
        .ast
        .expressions
        .push(block(ScopeId(99), vec![]));
    let json = serde_json::to_string(&unit).unwrap();
    let error = Unit::from_json(&json).unwrap_err();
    assert!(error.to_string().contains("unknown scope 99"));
}

#[test]
fn test_malformed_json_has_context() {
    let error = Unit::from_json("{ \"scopes\": 3 }").unwrap_err();
    assert!(error.to_string().contains("failed to parse analysis unit"));
}

fn reject(expressions: Vec<crate::ast::Expr>, scopes: ScopeTree) -> String {
    let root = scopes.root();
    let unit = Unit {
        scopes,
        modules: vec![UnitModule {
            module: root,
            ast: Ast::new(expressions),
        }],
    };
    let json = serde_json::to_string(&unit).unwrap();
    Unit::from_json(&json).unwrap_err().to_string()
}

#[test]
fn test_function_body_must_be_block() {
    let mut scopes = ScopeTree::new("main");
    let root = scopes.root();
    let id = scopes.declare_function(root, "f", AccessLevel::Public, vec![], false);
    let expressions = vec![function(&scopes, id, int("1"))];
    let error = reject(expressions, scopes);
    assert!(error.contains("function"), "{error}");
    assert!(error.contains("has a literal body, expected a block"), "{error}");
}

#[test]
fn test_loop_and_catch_bodies_must_be_blocks() {
    let scopes = ScopeTree::new("main");
    let error = reject(vec![for_each(&["x"], list(vec![]), call("f", vec![]))], scopes);
    assert!(error.contains("for at"), "{error}");
    assert!(error.contains("has a call body"), "{error}");

    let mut scopes = ScopeTree::new("main");
    let root_scope = scopes.module(scopes.root()).scope;
    let body = scopes.add_scope(root_scope);
    let error = reject(vec![try_catch(block(body, vec![]), Some("e"), nil())], scopes);
    assert!(error.contains("try at"), "{error}");
    assert!(error.contains("has a literal body"), "{error}");
}

#[test]
fn test_closure_must_be_attached_to_call() {
    let mut scopes = ScopeTree::new("main");
    let root_scope = scopes.module(scopes.root()).scope;
    let body = scopes.add_scope(root_scope);
    let error = reject(vec![closure(var("xs"), &["x"], block(body, vec![]))], scopes);
    assert!(error.contains("attached to a variable, expected a call"), "{error}");
}
