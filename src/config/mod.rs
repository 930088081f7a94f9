//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`NAVBENCH_BENCHMARK_FILE`,
//!    `NAVBENCH_ACTIONS_FILE`, `NAVBENCH_GROUPED_FILE`,
//!    `NAVBENCH_RESULTS_FILE`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./navbench.toml in the current directory
//! 4. $XDG_CONFIG_HOME/navbench/navbench.toml (or
//!    ~/.config/navbench/navbench.toml)
//! 5. Built-in defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::history::ContextLimits;
use crate::types::MessageLabel;

mod defaults;
mod env;
mod init;
mod sources;
mod types;

pub use init::{
    config_root_dir, default_global_config_path, default_local_config_path,
    initialize_config_at_path,
};
pub use types::{
    Config, ConfigInitResult, ConfigSource, DisplayConfig, LoadedConfig, PathsConfig,
    RecorderConfig, RunnerConfig,
};
use types::FileConfig;

/// Load configuration from disk and environment, reporting which file it
/// came from.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config_with_source(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        sources::read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let parsed: FileConfig = toml::from_str(&config_text)?;
    let mut config = resolve_file_config(parsed)?;
    env::apply_env_overrides(&mut config, &env_lookup);
    tracing::debug!(?source, "loaded configuration");
    Ok(LoadedConfig { config, source })
}

fn resolve_file_config(parsed: FileConfig) -> Result<Config, ConfigError> {
    let context = match parsed.context {
        Some(table) => resolve_context_limits(&table)?,
        None => ContextLimits::default(),
    };
    Ok(Config {
        paths: parsed.paths,
        context,
        recorder: parsed.recorder,
        runner: parsed.runner,
        display: parsed.display,
    })
}

/// Map `[context]` label names to caps; unknown labels are rejected.
fn resolve_context_limits(table: &BTreeMap<String, usize>) -> Result<ContextLimits, ConfigError> {
    table
        .iter()
        .map(|(name, max)| {
            MessageLabel::parse(name).map(|label| (label, *max)).ok_or_else(|| {
                let known: Vec<&str> = MessageLabel::ALL.iter().map(|l| l.as_str()).collect();
                ConfigError::Invalid(format!(
                    "unknown message label `{name}` in [context] (expected one of: {})",
                    known.join(", ")
                ))
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
