use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use shale_core::analysis::AnalysisScope;

pub const DEFAULT_CONFIG_FILE: &str = "shale.toml";

/// Settings read from a `shale.toml`-style file. Every section is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub log: LogConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub mode: AnalysisMode,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `shale::analysis=debug`
    pub filter: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    #[default]
    OncePerModule,
    #[serde(rename = "overwrite")]
    #[value(name = "overwrite")]
    OverwriteExistingModule,
}

impl From<AnalysisMode> for AnalysisScope {
    fn from(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::OncePerModule => AnalysisScope::OncePerModule,
            AnalysisMode::OverwriteExistingModule => AnalysisScope::OverwriteExistingModule,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Config> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Reads `path`, else `shale.toml` in the working directory when it
    /// exists, else returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path.map(Path::to_path_buf).or_else(|| Config::discover(Path::new("."))) {
            Some(path) => Config::read(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    fn read(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Config::from_toml_str(&text).with_context(|| format!("in config file '{}'", path.display()))
    }
}
