//! Configuration data model.
//!
//! `FileConfig` mirrors the TOML layout; `Config` is the resolved form the
//! rest of the crate consumes.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_ACTIONS_FILE, DEFAULT_BENCHMARK_FILE, DEFAULT_GROUPED_FILE, DEFAULT_RESULTS_FILE,
    DEFAULT_TRANSCRIPTS_DIR,
};
use crate::history::ContextLimits;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub paths: PathsConfig,
    /// Per-label caps applied by `history_view`.
    pub context: ContextLimits,
    pub recorder: RecorderConfig,
    pub runner: RunnerConfig,
    pub display: DisplayConfig,
}

/// Locations of the pipeline's JSON artifacts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub benchmark: PathBuf,
    pub actions: PathBuf,
    pub grouped: PathBuf,
    pub results: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            benchmark: DEFAULT_BENCHMARK_FILE.into(),
            actions: DEFAULT_ACTIONS_FILE.into(),
            grouped: DEFAULT_GROUPED_FILE.into(),
            results: DEFAULT_RESULTS_FILE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecorderConfig {
    /// Flush the action store after every append.
    pub flush_on_append: bool,
}

/// How `navbench run` drives the agent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Empty means the built-in prompt.
    pub system_prompt: String,
    pub transcripts_dir: PathBuf,
    /// External agent argv. Empty selects transcript replay.
    pub command: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            transcripts_dir: DEFAULT_TRANSCRIPTS_DIR.into(),
            command: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Raw TOML shape before label names are validated.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConfig {
    pub paths: PathsConfig,
    /// `None` keeps the default caps; a present table replaces them.
    pub context: Option<BTreeMap<String, usize>>,
    pub recorder: RecorderConfig,
    pub runner: RunnerConfig,
    pub display: DisplayConfig,
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config <path>`.
    Explicit(PathBuf),
    /// `./navbench.toml`.
    Local,
    /// `<config root>/navbench/navbench.toml`.
    Global(PathBuf),
    BuiltInDefaults,
}

/// Resolved configuration plus its source.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Outcome of `navbench init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigInitResult {
    Created { path: PathBuf },
    AlreadyInitialized { path: PathBuf },
    Overwritten { path: PathBuf, backup_path: PathBuf },
}
