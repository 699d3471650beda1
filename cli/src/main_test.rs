mod tests {
    use crate::*;

    #[test]
    fn test_sanitize_path_allows_simple_relative() {
        let p = sanitize_path("units/main.json").expect("relative path should be allowed");
        assert_eq!(p, PathBuf::from("units/main.json"));
    }

    #[test]
    fn test_sanitize_path_rejects_parent_dir() {
        let err = sanitize_path("units/../main.json").unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[test]
    fn test_cli_args_rejects_parent_dir_in_check() {
        let err = CliArgs::try_parse_from(["shale", "check", "a/../b.json"]).unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[test]
    fn test_cli_args_parse_mode_and_globals() {
        let args = CliArgs::try_parse_from([
            "shale",
            "dump",
            "unit.json",
            "--mode",
            "overwrite",
            "--log",
            "shale=debug",
        ])
        .expect("should parse");
        assert_eq!(args.log.as_deref(), Some("shale=debug"));
        match args.command {
            Commands::Dump { unit, mode } => {
                assert_eq!(unit, PathBuf::from("unit.json"));
                assert_eq!(mode, Some(AnalysisMode::OverwriteExistingModule));
            }
            other => panic!("expected dump command, got {other:?}"),
        }
    }

    #[test]
    fn test_mode_flag_wins_over_config() {
        let config = Config::from_toml_str("[analysis]\nmode = \"overwrite\"\n").unwrap();
        assert_eq!(analysis_scope(None, &config), AnalysisScope::OverwriteExistingModule);
        assert_eq!(
            analysis_scope(Some(AnalysisMode::OncePerModule), &config),
            AnalysisScope::OncePerModule
        );
    }

    #[test]
    fn test_log_flag_wins() {
        let config = Config::from_toml_str("[log]\nfilter = \"info\"\n").unwrap();
        assert_eq!(log_filter(Some("trace"), &config), "trace");
    }

    #[test]
    fn test_module_lookup_by_path() {
        use shale_core::ast::AccessLevel;

        let mut tree = ScopeTree::new("main");
        let root = tree.root();
        let net = tree.add_module(root, "net", AccessLevel::Public);
        let http = tree.add_module(net, "http", AccessLevel::Public);
        assert_eq!(find_module_by_path(&tree, "net::http"), Some(http));
        assert_eq!(find_module_by_path(&tree, ""), Some(root));
        assert_eq!(find_module_by_path(&tree, "http"), None);
        assert_eq!(module_label(&tree, http), "net::http");
        assert_eq!(module_label(&tree, root), "main");
    }
}
