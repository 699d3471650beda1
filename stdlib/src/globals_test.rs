#[cfg(test)]
mod tests {
    use anyhow::Result;
    use shale_core::{
        analysis::{AnalysisErrorKind, AnalysisScope, Analyzer},
        ast::{Ast, CallType, build::*},
        registry::StdRegistry,
        scope::ScopeTree,
    };

    use crate::StdBindings;

    fn analyze(tree: &mut ScopeTree, expressions: Vec<shale_core::ast::Expr>) -> Result<Ast> {
        let root = tree.root();
        Ok(Analyzer::analyze(
            tree,
            StdBindings::global(),
            Ast::new(expressions),
            root,
            AnalysisScope::OverwriteExistingModule,
        )?)
    }

    #[test]
    fn test_global_lookup_ignores_modules() {
        let bindings = StdBindings::global();
        let println = bindings.function("println", &[]).unwrap();
        assert!(println.is_variadic());
        assert!(println.module.is_none());
        assert!(bindings.function("upper", &[]).is_none());
        assert!(bindings.function("len", &["str".to_string(), "x".to_string()]).is_none());
    }

    #[test]
    fn test_closure_functions_declare_parameter_counts() {
        let bindings = StdBindings::global();
        for name in ["each", "map", "filter", "all", "any"] {
            assert_eq!(bindings.function(name, &[]).unwrap().closure_parameter_count, Some(1), "{name}");
        }
        assert_eq!(bindings.function("reduce", &[]).unwrap().closure_parameter_count, Some(2));
    }

    #[test]
    fn test_pipe_flags() {
        let bindings = StdBindings::global();
        assert!(bindings.function("lines", &[]).unwrap().consumes_pipe);
        assert!(bindings.function("time", &[]).unwrap().starts_pipe_manually);
        assert!(!bindings.function("len", &[]).unwrap().consumes_pipe);
    }

    #[test]
    fn test_runtime_types() {
        let bindings = StdBindings::global();
        assert_eq!(bindings.runtime_type("Error").unwrap().name, "Error");
        assert!(bindings.runtime_type("Integer").is_some());
        assert!(bindings.runtime_type("Int").is_none());
    }

    #[test]
    fn test_analysis_against_real_bindings() -> Result<()> {
        let mut tree = ScopeTree::new("main");
        let ast = analyze(
            &mut tree,
            vec![
                pipe(command("cat", &["notes.txt"]), call("lines", vec![])),
                call("println", vec![string("a"), int("1"), float("2.0")]),
                path_call(&["math"], "max", vec![int("1"), int("2")]),
            ],
        )?;

        let lines = ast.expressions[0].as_call().unwrap();
        assert_eq!(lines.call_type, Some(CallType::StdFunction));
        let cat = lines.arguments[0].as_call().unwrap();
        assert!(cat.disable_redirection_buffering);

        let max = ast.expressions[2].as_call().unwrap();
        assert_eq!(max.std_function.as_ref().and_then(|f| f.module.as_deref()), Some("math"));
        Ok(())
    }

    #[test]
    fn test_missing_function_in_std_module() {
        let mut tree = ScopeTree::new("main");
        let error = analyze(&mut tree, vec![path_call(&["math"], "tau", vec![])]).unwrap_err();
        let error = error.downcast::<shale_core::analysis::AnalysisError>().unwrap();
        assert_eq!(
            error.kind,
            AnalysisErrorKind::NotFound {
                name: "tau".to_string()
            }
        );
    }
}
