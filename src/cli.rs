//! CLI argument parsing via clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use navbench::build_info::LONG_VERSION;
use std::path::PathBuf;

/// Run a web-browsing agent over a benchmark and score its actions.
#[derive(Debug, Parser)]
#[command(name = "navbench", version, long_version = LONG_VERSION)]
pub struct Args {
    /// Path to config file (default: ./navbench.toml or ~/.config/navbench/navbench.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    #[command(flatten)]
    pub paths: PathOverrides,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Per-invocation artifact paths; these beat config and environment.
#[derive(Debug, Default, ClapArgs)]
pub struct PathOverrides {
    /// Benchmark task list.
    #[arg(long, global = true, value_name = "FILE")]
    pub benchmark: Option<PathBuf>,

    /// Flat action log.
    #[arg(long, global = true, value_name = "FILE")]
    pub actions: Option<PathBuf>,

    /// Actions grouped by task.
    #[arg(long, global = true, value_name = "FILE")]
    pub grouped: Option<PathBuf>,

    /// Final per-task results.
    #[arg(long, global = true, value_name = "FILE")]
    pub results: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a default navbench.toml.
    Init {
        /// Write to the global config directory instead of ./navbench.toml.
        #[arg(long)]
        global: bool,
        /// Replace an existing file, keeping a timestamped backup.
        #[arg(long)]
        force: bool,
    },
    /// Run the agent over every benchmark task and record its actions.
    Run {
        /// Replay transcripts from this directory.
        #[arg(long, value_name = "DIR", conflicts_with = "agent")]
        transcripts: Option<PathBuf>,
        /// Flush the action store after every append.
        #[arg(long)]
        flush_on_append: bool,
        /// External agent command, given after `--`.
        #[arg(last = true, value_name = "AGENT")]
        agent: Vec<String>,
    },
    /// Partition the action log by task id.
    Group,
    /// Align grouped actions with the benchmark's desired actions.
    Align,
    /// Print metrics for a results file.
    Score {
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Group, align, and score in one step.
    Evaluate {
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },
}
