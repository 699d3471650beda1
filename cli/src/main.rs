use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use shale_core::{
    analysis::{AnalysisScope, AnalysisSession, Analyzer},
    scope::{ModuleId, ScopeTree},
    unit::{Unit, UnitModule},
};
use shale_stdlib::StdBindings;
use tracing::{debug, info};

mod config;

use config::{AnalysisMode, Config};

static TRACE_INIT: Once = Once::new();
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "shale", author, version, about = "Semantic analysis for shale scripts", long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); `shale.toml` in the working directory when omitted
    #[arg(long, global = true, value_name = "FILE", value_parser = parse_sanitized_path)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `shale::analysis=debug`. Overrides SHALE_LOG and RUST_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyse every module of a unit and report the first error.
    Check {
        #[arg(value_name = "UNIT", value_parser = parse_sanitized_path)]
        unit: PathBuf,
        #[arg(long, value_enum)]
        mode: Option<AnalysisMode>,
    },
    /// Analyse a unit and print the analysed unit as JSON.
    Dump {
        #[arg(value_name = "UNIT", value_parser = parse_sanitized_path)]
        unit: PathBuf,
        #[arg(long, value_enum)]
        mode: Option<AnalysisMode>,
    },
    /// Print the semantic tokens of one module as JSON.
    Tokens {
        #[arg(value_name = "UNIT", value_parser = parse_sanitized_path)]
        unit: PathBuf,
        /// Module path such as `net::http`; the root module when omitted
        #[arg(long)]
        module: Option<String>,
    },
    /// List the standard library modules known to the analyzer.
    Std,
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);
    if p.components().any(|comp| matches!(comp, Component::ParentDir)) {
        bail!("Parent directory components ('..') are not allowed in file paths.");
    }
    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

/// First non-empty filter among the flag, SHALE_LOG, RUST_LOG and the config.
fn log_filter(flag: Option<&str>, config: &Config) -> String {
    let from_env = |name: &str| std::env::var(name).ok();
    flag.map(str::to_string)
        .or_else(|| from_env("SHALE_LOG"))
        .or_else(|| from_env("RUST_LOG"))
        .or_else(|| config.log.filter.clone())
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn init_tracing(filter: &str) {
    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let builder = fmt().with_writer(std::io::stderr);
        let builder = match EnvFilter::try_new(filter) {
            Ok(filter) => builder.with_env_filter(filter),
            Err(_) => builder.with_env_filter(DEFAULT_LOG_FILTER),
        };
        let _ = builder.try_init();
    });
}

fn read_unit(path: &Path) -> anyhow::Result<Unit> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", path.display(), e))?;
    Unit::from_json(&text).with_context(|| format!("in unit '{}'", path.display()))
}

fn analysis_scope(flag: Option<AnalysisMode>, config: &Config) -> AnalysisScope {
    flag.unwrap_or(config.analysis.mode).into()
}

fn module_label(tree: &ScopeTree, id: ModuleId) -> String {
    let path = tree.module_path(id);
    if path.is_empty() {
        tree.module(id).name.clone()
    } else {
        path.join("::")
    }
}

fn find_module_by_path(tree: &ScopeTree, path: &str) -> Option<ModuleId> {
    let wanted: Vec<&str> = path.split("::").filter(|part| !part.is_empty()).collect();
    tree.module_ids().find(|id| tree.module_path(*id) == wanted)
}

/// Runs the analyzer over every module of `unit` and returns the unit with
/// the analysed trees in place of the parsed ones.
fn analyze_unit(unit: Unit, scope: AnalysisScope) -> anyhow::Result<Unit> {
    let Unit { mut scopes, modules } = unit;
    let registry = StdBindings::global();

    let analysed = {
        let mut session = AnalysisSession::new(&mut scopes, registry, scope);
        for entry in modules {
            session.add_module(entry.module, entry.ast);
        }
        session.run()?
    };

    for module in analysed.keys() {
        info!(target: "shale::cli", module = %module_label(&scopes, *module), "analysed");
    }
    let modules = analysed
        .into_iter()
        .map(|(module, ast)| UnitModule { module, ast })
        .collect();
    Ok(Unit { scopes, modules })
}

fn check(path: &Path, scope: AnalysisScope) -> anyhow::Result<()> {
    let unit = analyze_unit(read_unit(path)?, scope)?;
    for entry in &unit.modules {
        println!("ok {}", module_label(&unit.scopes, entry.module));
    }
    Ok(())
}

fn dump(path: &Path, scope: AnalysisScope) -> anyhow::Result<()> {
    let unit = analyze_unit(read_unit(path)?, scope)?;
    println!("{}", unit.to_json_pretty()?);
    Ok(())
}

fn tokens(path: &Path, module: Option<&str>) -> anyhow::Result<()> {
    let Unit { mut scopes, modules } = read_unit(path)?;
    let target = match module {
        Some(name) => find_module_by_path(&scopes, name).with_context(|| format!("unknown module '{name}'"))?,
        None => scopes.root(),
    };
    let registry = StdBindings::global();

    // Imported modules have to be analysed before the target can resolve them.
    let mut target_ast = None;
    let mut session = AnalysisSession::new(&mut scopes, registry, AnalysisScope::OncePerModule);
    for UnitModule { module, ast } in modules {
        if module == target {
            target_ast = Some(ast);
        } else {
            session.add_module(module, ast);
        }
    }
    session.run()?;

    let ast = target_ast.with_context(|| format!("unit has no tree for module '{}'", module_label(&scopes, target)))?;
    debug!(target: "shale::cli", module = %module_label(&scopes, target), "collecting semantic tokens");
    let tokens = Analyzer::semantic_tokens(&mut scopes, registry, ast, target)?;
    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(())
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    init_tracing(&log_filter(args.log.as_deref(), &config));

    match args.command {
        Commands::Check { unit, mode } => check(&unit, analysis_scope(mode, &config)),
        Commands::Dump { unit, mode } => dump(&unit, analysis_scope(mode, &config)),
        Commands::Tokens { unit, module } => tokens(&unit, module.as_deref()),
        Commands::Std => {
            for name in StdBindings::global().module_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod main_test;
