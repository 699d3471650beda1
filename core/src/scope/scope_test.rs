use super::*;
use crate::{ast::build::param, token::Span};

#[test]
fn test_variable_lookup_walks_parents() {
    let mut tree = ScopeTree::new("main");
    let root = tree.module(tree.root()).scope;
    let outer = tree.add_scope(root);
    let inner = tree.add_scope(outer);

    tree.add_variable(outer, "x");
    assert!(tree.has_variable(inner, "x"));
    assert!(!tree.has_declaration_of_variable(inner, "x"));
    assert_eq!(tree.find_variable_scope(inner, "x"), Some(outer));
    assert!(!tree.has_variable(root, "x"));
}

#[test]
fn test_redeclaring_keeps_capture_flag() {
    let mut tree = ScopeTree::new("main");
    let root = tree.module(tree.root()).scope;
    tree.add_variable(root, "x");
    tree.find_variable_mut(root, "x").unwrap().is_captured = true;
    tree.add_variable(root, "x");
    assert!(tree.variable(root, "x").unwrap().is_captured);
}

#[test]
fn test_find_module_by_path() {
    let mut tree = ScopeTree::new("main");
    let root = tree.root();
    let net = tree.add_module(root, "net", AccessLevel::Public);
    let http = tree.add_module(net, "http", AccessLevel::Public);
    let other = tree.add_module(root, "other", AccessLevel::Public);

    let path = |segments: &[&str]| segments.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(tree.find_module(root, &path(&["net", "http"]), false), Some(http));
    assert_eq!(tree.find_module(root, &[], false), Some(root));
    // Falls back to the root's submodules
    assert_eq!(tree.find_module(other, &path(&["net"]), false), Some(net));
    assert_eq!(tree.find_module(root, &path(&["http"]), false), None);
    assert_eq!(tree.module_path(http), ["net", "http"]);
}

#[test]
fn test_imported_module_only_visible_with_imports() {
    let mut tree = ScopeTree::new("main");
    let root = tree.root();
    let a = tree.add_module(root, "a", AccessLevel::Public);
    let b = tree.add_module(a, "b", AccessLevel::Public);
    let c = tree.add_module(root, "c", AccessLevel::Public);
    tree.module_mut(c).import_module("b", b);

    let path = vec!["b".to_string()];
    assert_eq!(tree.find_module(c, &path, true), Some(b));
    assert_eq!(tree.find_module(c, &path, false), None);
}

#[test]
fn test_declare_and_register_function() {
    let mut tree = ScopeTree::new("main");
    let root = tree.root();
    let id = tree.declare_function(root, "greet", AccessLevel::Public, vec![param("name")], false);
    assert_eq!(tree.function(id).status, AnalysisStatus::None);
    assert_eq!(tree.find_function(root, "greet", false), Some(id));

    let mut analysed = tree.function(id).clone();
    analysed.status = AnalysisStatus::Analysed;
    tree.register_function(id, analysed);
    assert_eq!(tree.function(id).status, AnalysisStatus::Analysed);
    assert_eq!(tree.function(id).min_argument_count(), 1);
    assert_eq!(tree.function(id).max_argument_count(), Some(1));
}

#[test]
fn test_register_struct_reuses_declaration() {
    let mut tree = ScopeTree::new("main");
    let root = tree.root();
    let declared = tree.declare_struct(root, "Point", AccessLevel::Private, vec![param("x")]);
    let registered = tree.register_struct(StructSymbol {
        name: "Point".to_string(),
        access: AccessLevel::Public,
        module: root,
        parameters: vec![param("x"), param("y")],
    });
    assert_eq!(declared, registered);
    assert_eq!(tree.structure(declared).parameters.len(), 2);
}

#[test]
fn test_import_queue_is_drained() {
    let mut tree = ScopeTree::new("main");
    let root = tree.root();
    let lib = tree.add_module(root, "lib", AccessLevel::Public);
    tree.queue_import(root, lib, Token::identifier("helper", Span::default()));

    assert_eq!(tree.module_mut(root).take_unresolved_imports().len(), 1);
    assert!(tree.module(root).unresolved_imports.is_empty());
}
