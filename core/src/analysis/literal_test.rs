use super::{literal::parse_integer, test_support::*, *};
use crate::{
    ast::{AccessLevel, ExprKind, Parameter, build::*},
    token::TokenKind,
    val::ConstValue,
};

fn literal_value(fx: &mut Fixture, expr: crate::ast::Expr) -> Result<ConstValue> {
    let ast = fx.analyze(vec![expr])?;
    match &ast.expressions[0].kind {
        ExprKind::Literal(literal) => Ok(literal.value.clone().unwrap()),
        other => panic!("expected a literal, got {other:?}"),
    }
}

#[test]
fn test_parse_integer_radixes() {
    assert_eq!(parse_integer("0x1F"), Some(31));
    assert_eq!(parse_integer("0b101"), Some(5));
    assert_eq!(parse_integer("0o17"), Some(15));
    assert_eq!(parse_integer("42"), Some(42));
    assert_eq!(parse_integer("0xGG"), None);
    assert_eq!(parse_integer("0x"), None);
    assert_eq!(parse_integer("0x-1"), None);
    assert_eq!(parse_integer("0x7FFFFFFFFFFFFFFF"), Some(i64::MAX));
    assert_eq!(parse_integer("0xFFFFFFFFFFFFFFFF"), None);
}

#[test]
fn test_literal_values() {
    let mut fx = Fixture::new();
    assert_eq!(literal_value(&mut fx, int("0x1F")).unwrap(), ConstValue::Integer(31));
    assert_eq!(literal_value(&mut fx, float("2.5")).unwrap(), ConstValue::Float(2.5));
    assert_eq!(literal_value(&mut fx, string("hi")).unwrap(), ConstValue::string("hi"));
    assert_eq!(
        literal_value(&mut fx, text("--all")).unwrap(),
        ConstValue::text_argument("--all")
    );
    assert_eq!(
        literal_value(&mut fx, literal(TokenKind::False, "false")).unwrap(),
        ConstValue::Boolean(false)
    );
    assert_eq!(literal_value(&mut fx, nil()).unwrap(), ConstValue::Nil);
}

#[test]
fn test_malformed_number_literal() {
    let mut fx = Fixture::new();
    let error = literal_value(&mut fx, int("0xGG")).unwrap_err();
    assert_eq!(
        error.kind,
        AnalysisErrorKind::InvalidNumberLiteral {
            literal: "0xGG".to_string()
        }
    );
    assert!(literal_value(&mut fx, float("1.2.3")).is_err());
}

fn analyze_signature(parameters: Vec<Parameter>) -> Result<()> {
    let mut fx = Fixture::new();
    let root = fx.root();
    let root_scope = fx.root_scope();
    let id = fx.tree.declare_function(root, "f", AccessLevel::Public, parameters, false);
    let body = fx.scope(root_scope);
    fx.analyze(vec![function(&fx.tree, id, block(body, vec![]))]).map(|_| ())
}

#[test]
fn test_parameter_list_shapes() {
    let error = analyze_signature(vec![param("a"), default_param("b", int("1")), param("c")]).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::MisplacedDefaultParameter);

    analyze_signature(vec![param("a"), default_param("b", int("1"))]).unwrap();
    analyze_signature(vec![param("a"), variadic_param("rest")]).unwrap();

    let error = analyze_signature(vec![variadic_param("rest"), param("a")]).unwrap_err();
    assert_eq!(error.kind, AnalysisErrorKind::MisplacedVariadicParameter);
}

#[test]
fn test_default_values_must_be_literal() {
    analyze_signature(vec![default_param("xs", list(vec![]))]).unwrap();
    analyze_signature(vec![default_param("opts", dictionary(vec![]))]).unwrap();
    analyze_signature(vec![default_param("s", interpolation(vec![string("x")]))]).unwrap();

    for default in [
        list(vec![int("1")]),
        call("now", vec![]),
        interpolation(vec![string("a"), var("b")]),
    ] {
        let error = analyze_signature(vec![default_param("p", default)]).unwrap_err();
        assert_eq!(error.kind, AnalysisErrorKind::NonLiteralDefault);
    }
}

#[test]
fn test_failed_signature_marks_function() {
    let mut fx = Fixture::new();
    let root = fx.root();
    let root_scope = fx.root_scope();
    let id = fx.tree.declare_function(
        root,
        "f",
        AccessLevel::Public,
        vec![variadic_param("rest"), param("a")],
        false,
    );
    let body = fx.scope(root_scope);
    assert!(fx.analyze(vec![function(&fx.tree, id, block(body, vec![]))]).is_err());
    assert_eq!(fx.tree.function(id).status, crate::scope::AnalysisStatus::Failed);
}
