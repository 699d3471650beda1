use super::{test_support::*, *};
use crate::{
    ast::{AccessLevel, BinaryOp, CallType, ExprKind, RedirectionKind, build::*},
    token::TokenKind,
    val::ConstValue,
};

#[test]
fn test_unknown_name_is_a_program_call() {
    let mut fx = Fixture::new();
    let ast = fx.analyze(vec![command("frobnicate", &["arg1"])]).unwrap();
    let call = call_named(&ast, "frobnicate");
    assert_eq!(call.call_type, Some(CallType::Program));
    assert!(call.std_function.is_none());
    assert!(call.function.is_none());
    assert_eq!(
        call.arguments[0].kind,
        ExprKind::Literal(crate::ast::LiteralExpr {
            token: crate::token::Token::new(TokenKind::TextArgumentStringLiteral, "arg1", Default::default()),
            value: Some(ConstValue::text_argument("arg1")),
        })
    );
}

#[test]
fn test_program_pipe_redirects_instead_of_inserting() {
    let mut fx = Fixture::new();
    let ast = fx
        .analyze(vec![pipe(call("echo", vec![string("hi")]), command("wc", &[]))])
        .unwrap();

    let wc = ast.expressions[0].as_call().unwrap();
    assert_eq!(wc.name.value, "wc");
    assert!(wc.arguments.is_empty());
    let echo = wc.piped_to_program.as_ref().and_then(|e| e.as_call()).unwrap();
    assert_eq!(echo.name.value, "echo");
    assert_eq!(echo.redirection, RedirectionKind::Output);
    assert!(echo.disable_redirection_buffering);
}

#[test]
fn test_value_pipe_becomes_first_argument() {
    let mut fx = Fixture::new();
    let ast = fx
        .analyze(vec![pipe(list(vec![int("1"), int("2")]), call("len", vec![]))])
        .unwrap();

    let len = ast.expressions[0].as_call().unwrap();
    assert_eq!(len.call_type, Some(CallType::StdFunction));
    assert!(len.piped_to_program.is_none());
    assert_eq!(len.arguments.len(), 1);
    assert!(matches!(len.arguments[0].kind, ExprKind::List(_)));
}

#[test]
fn test_program_piped_into_std_function() {
    let mut fx = Fixture::new();
    let ast = fx
        .analyze(vec![
            pipe(command("cat", &["log"]), call("len", vec![])),
            pipe(command("cat", &["log"]), call("lines", vec![])),
        ])
        .unwrap();

    let buffered = ast.expressions[0].as_call().unwrap().arguments[0].as_call().unwrap();
    assert_eq!(buffered.redirection, RedirectionKind::Output);
    assert!(!buffered.disable_redirection_buffering);
    let streamed = ast.expressions[1].as_call().unwrap().arguments[0].as_call().unwrap();
    assert!(streamed.disable_redirection_buffering);
}

#[test]
fn test_error_redirection_needs_a_program() {
    let mut fx = Fixture::new();
    let error = fx
        .analyze(vec![binary(int("1"), BinaryOp::PipeErr, command("wc", &[]))])
        .unwrap_err();
    assert_eq!(
        error.kind,
        AnalysisErrorKind::InvalidRedirection {
            operator: "|err".to_string()
        }
    );

    let ast = fx
        .analyze(vec![binary(command("make", &[]), BinaryOp::PipeAll, command("tee", &["out"]))])
        .unwrap();
    let make = ast.expressions[0].as_call().unwrap().piped_to_program.as_ref().unwrap();
    assert_eq!(make.as_call().unwrap().redirection, RedirectionKind::All);
}

#[test]
fn test_pipe_needs_a_call_on_the_right() {
    let mut fx = Fixture::new();
    let error = fx.analyze(vec![pipe(command("ls", &[]), int("1"))]).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::ExpectedCallAfterPipe);
}

#[test]
fn test_closure_signature_must_match() {
    let mut fx = Fixture::new();
    let root = fx.root();
    let root_scope = fx.root_scope();
    let plain = fx.tree.declare_function(root, "plain", AccessLevel::Public, vec![], false);
    let wrapper = fx.tree.declare_function(root, "wrapper", AccessLevel::Public, vec![], true);
    let plain_body = fx.scope(root_scope);
    let wrapper_body = fx.scope(root_scope);
    let closure_body = fx.scope(root_scope);
    let decls = vec![
        function(&fx.tree, plain, block(plain_body, vec![])),
        function(&fx.tree, wrapper, block(wrapper_body, vec![])),
    ];

    let mut with_closure = decls.clone();
    with_closure.push(closure(call("plain", vec![]), &[], block(closure_body, vec![])));
    let error = fx.analyze(with_closure).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::UnexpectedClosure { program_call: false });

    let mut fx = Fixture::new();
    let root = fx.root();
    let root_scope = fx.root_scope();
    fx.tree.declare_function(root, "plain", AccessLevel::Public, vec![], false);
    let wrapper = fx.tree.declare_function(root, "wrapper", AccessLevel::Public, vec![], true);
    let wrapper_body = fx.scope(root_scope);
    let error = fx
        .analyze(vec![
            function(&fx.tree, wrapper, block(wrapper_body, vec![])),
            call("wrapper", vec![]),
        ])
        .unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::ExpectedClosure);
}

#[test]
fn test_closure_on_program_call() {
    let mut fx = Fixture::new();
    let body = fx.scope(fx.root_scope());
    let error = fx
        .analyze(vec![closure(command("frobnicate", &[]), &[], block(body, vec![]))])
        .unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::UnexpectedClosure { program_call: true });
    assert!(error.to_string().contains("program invocation"));
}

#[test]
fn test_std_function_needs_its_closure() {
    let mut fx = Fixture::new();
    let error = fx.analyze(vec![call("map", vec![list(vec![])])]).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::ExpectedClosure);
}

#[test]
fn test_std_argument_counts() {
    let mut fx = Fixture::new();
    let error = fx.analyze(vec![call("len", vec![])]).unwrap_err();
    assert_eq!(
        error.kind,
        AnalysisErrorKind::WrongArgumentCount {
            name: "len".to_string(),
            min: 1,
            max: Some(1),
            actual: 0,
            variadic: false,
        }
    );

    let error = fx
        .analyze(vec![path_call(&["str"], "split", vec![string("a"), string("b"), string("c")])])
        .unwrap_err();
    assert!(error.to_string().contains("Expected 1-2 but got 3"));

    fx.analyze(vec![call("println", vec![int("1"), int("2"), int("3")])])
        .unwrap();
    // A reference only has to respect the upper bound
    fx.analyze(vec![reference(&[], "len")]).unwrap();
}

#[test]
fn test_user_argument_counts() {
    let mut fx = Fixture::new();
    let root = fx.root();
    let root_scope = fx.root_scope();
    let id = fx.tree.declare_function(
        root,
        "log",
        AccessLevel::Public,
        vec![param("level"), default_param("prefix", string("")), variadic_param("rest")],
        false,
    );
    let body = fx.scope(root_scope);
    let decl = function(&fx.tree, id, block(body, vec![]));

    fx.analyze(vec![
        decl,
        call("log", vec![int("1")]),
        call("log", vec![int("1"), string("x"), int("2"), int("3")]),
    ])
    .unwrap();

    let error = fx.analyze(vec![call("log", vec![])]).unwrap_err();
    assert_eq!(
        error.kind,
        AnalysisErrorKind::WrongArgumentCount {
            name: "log".to_string(),
            min: 1,
            max: None,
            actual: 0,
            variadic: true,
        }
    );
    assert!(error.to_string().contains("Expected at least 1"));
}

#[test]
fn test_std_module_without_the_function() {
    let mut fx = Fixture::new();
    let error = fx.analyze(vec![path_call(&["str"], "reverse", vec![])]).unwrap_err();
    assert_eq!(
        error.kind,
        AnalysisErrorKind::NotFound {
            name: "reverse".to_string()
        }
    );

    let ast = fx.analyze(vec![path_call(&["str"], "upper", vec![string("a")])]).unwrap();
    let upper = call_named(&ast, "upper");
    assert_eq!(upper.call_type, Some(CallType::StdFunction));
    assert_eq!(upper.std_function.as_ref().and_then(|f| f.module.as_deref()), Some("str"));
}

#[test]
fn test_manually_started_arguments() {
    let mut fx = Fixture::new();
    let ast = fx.analyze(vec![call("time", vec![command("sleep", &["1"])])]).unwrap();
    assert!(!call_named(&ast, "sleep").automatic_start);

    let ast = fx.analyze(vec![call("len", vec![command("ls", &[])])]).unwrap();
    assert!(call_named(&ast, "ls").automatic_start);
}

#[test]
fn test_builtins_are_never_user_functions() {
    let mut fx = Fixture::new();
    let root = fx.root();
    fx.tree.declare_function(root, "exec", AccessLevel::Public, vec![], false);
    let ast = fx.analyze(vec![call("exec", vec![string("ls")])]).unwrap();
    let exec = call_named(&ast, "exec");
    assert_eq!(exec.call_type, Some(CallType::BuiltInExec));
    assert!(exec.function.is_none());
}

#[test]
fn test_closure_call_outside_closure_function() {
    let mut fx = Fixture::new();
    let error = fx.analyze(vec![call("closure", vec![])]).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::UnexpectedClosureCall);

    let root = fx.root();
    let root_scope = fx.root_scope();
    let id = fx.tree.declare_function(root, "plain", AccessLevel::Public, vec![], false);
    let body = fx.scope(root_scope);
    let error = fx
        .analyze(vec![function(&fx.tree, id, block(body, vec![call("closure", vec![])]))])
        .unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::UnexpectedClosureCall);
}

#[test]
fn test_closure_call_inside_closure_function() {
    let mut fx = Fixture::new();
    let root = fx.root();
    let root_scope = fx.root_scope();
    let id = fx.tree.declare_function(root, "each", AccessLevel::Public, vec![param("x")], true);
    let body = fx.scope(root_scope);
    let ast = fx
        .analyze(vec![function(
            &fx.tree,
            id,
            block(body, vec![call("closure", vec![var("x")])]),
        )])
        .unwrap();

    let invoke = call_named(&ast, "closure");
    assert_eq!(invoke.call_type, Some(CallType::BuiltInClosure));
    assert_eq!(invoke.closure_provider, Some(id));
    assert!(!fx.tree.function(id).closure_captured);
}

#[test]
fn test_assignment_targets() {
    let mut fx = Fixture::new();
    fx.analyze(vec![
        let_binding(&["x"], int("1")),
        assign(var("x"), int("2")),
        let_binding(&["xs"], list(vec![int("1")])),
        assign(index(var("xs"), int("0")), int("5")),
    ])
    .unwrap();

    let error = fx.analyze(vec![assign(call("x", vec![]), int("1"))]).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::InvalidAssignment { parsed_as_call: true });
    let error = fx.analyze(vec![assign(int("3"), int("1"))]).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::InvalidAssignment { parsed_as_call: false });
    let error = fx.analyze(vec![assign(var("undeclared"), int("1"))]).unwrap_err();
    assert!(matches!(error.kind, AnalysisErrorKind::NotFound { .. }));
}

#[test]
fn test_bash_literal_becomes_program_call() {
    let mut fx = Fixture::new();
    let ast = fx
        .analyze(vec![literal(TokenKind::BashLiteral, "$:ls -la | head")])
        .unwrap();
    let bash = ast.expressions[0].as_call().unwrap();
    assert_eq!(bash.name.value, "bash");
    assert_eq!(bash.call_type, Some(CallType::Program));
    let values: Vec<_> = bash
        .arguments
        .iter()
        .map(|arg| match &arg.kind {
            ExprKind::Literal(literal) => literal.value.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(
        values,
        [Some(ConstValue::string("-c")), Some(ConstValue::string("ls -la | head"))]
    );
}
