//! Unified error types for the benchmark harness.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors from writing persisted JSON artifacts.
///
/// Reads never produce this error: missing or corrupt files degrade to an
/// empty collection instead.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io ({}): {source}", path.display()),
            Self::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// HistoryError
// ---------------------------------------------------------------------------

/// Errors raised by message-history mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// `pop` was called on a history with no messages.
    Empty,
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "pop from empty message history"),
        }
    }
}

impl std::error::Error for HistoryError {}

// ---------------------------------------------------------------------------
// RunError
// ---------------------------------------------------------------------------

/// Errors surfaced while driving the agent runtime over the task list.
#[derive(Debug)]
pub enum RunError {
    /// The agent runtime failed on one task.
    Runtime { step: usize, message: String },
    Store(StoreError),
    /// The benchmark file was missing, unreadable, or held no tasks.
    EmptyBenchmark(PathBuf),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime { step, message } => write!(f, "agent runtime (task {step}): {message}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::EmptyBenchmark(path) => {
                write!(f, "no benchmark tasks found in {}", path.display())
            }
        }
    }
}

impl std::error::Error for RunError {}

impl From<StoreError> for RunError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// BenchError
// ---------------------------------------------------------------------------

/// Top-level error type for the CLI.
#[derive(Debug)]
pub enum BenchError {
    Config(ConfigError),
    Store(StoreError),
    Run(RunError),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Run(e) => write!(f, "run: {e}"),
        }
    }
}

impl std::error::Error for BenchError {}

impl From<ConfigError> for BenchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StoreError> for BenchError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<RunError> for BenchError {
    fn from(e: RunError) -> Self {
        Self::Run(e)
    }
}
