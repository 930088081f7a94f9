//! CLI entry point for navbench.

mod cli;

use clap::Parser;
use crossterm::style::Stylize;
use navbench::actions::{ActionRecorder, JsonFileStore};
use navbench::benchmark::load_benchmark;
use navbench::build_info;
use navbench::config::{
    default_global_config_path, default_local_config_path, initialize_config_at_path,
    load_config_with_source, Config, ConfigInitResult, PathsConfig,
};
use navbench::error::{BenchError, ConfigError, RunError, StoreError};
use navbench::runner::{AgentRuntime, CommandRuntime, TaskRunner, TranscriptRuntime};
use navbench::scoring::{align_files, group_file, render_report, score_file, ScoreReport};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing(!args.no_color);
    let color = !args.no_color;

    if let Err(e) = run(args).await {
        if color {
            eprintln!("{} {e}", "error:".red().bold());
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

/// Log filter: `NAVBENCH_LOG`, then `RUST_LOG`, then `warn`.
fn init_tracing(ansi: bool) {
    let filter = std::env::var("NAVBENCH_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .try_init();
}

async fn run(args: cli::Args) -> Result<(), BenchError> {
    if let cli::Command::Init { global, force } = args.command {
        return init_config(global, force);
    }

    let loaded = load_config_with_source(args.config.as_deref())?;
    info!(source = ?loaded.source, "{}", build_info::version_line());
    let mut config = loaded.config;
    apply_path_overrides(&mut config.paths, args.paths);
    if args.no_color {
        config.display.color = false;
    }

    match args.command {
        cli::Command::Init { .. } => Ok(()),
        cli::Command::Run {
            transcripts,
            flush_on_append,
            agent,
        } => run_benchmark(&config, transcripts, flush_on_append, agent).await,
        cli::Command::Group => {
            let groups = group_file(&config.paths.actions, &config.paths.grouped)?;
            println!(
                "Grouped {} task(s) into {}",
                groups.len(),
                config.paths.grouped.display()
            );
            Ok(())
        }
        cli::Command::Align => {
            let scores = align_files(
                &config.paths.benchmark,
                &config.paths.grouped,
                &config.paths.results,
            )?;
            println!(
                "Aligned {} task(s) into {}",
                scores.len(),
                config.paths.results.display()
            );
            Ok(())
        }
        cli::Command::Score { json } => {
            print_report(&score_file(&config.paths.results), json, &config)
        }
        cli::Command::Evaluate { json } => {
            group_file(&config.paths.actions, &config.paths.grouped)?;
            align_files(
                &config.paths.benchmark,
                &config.paths.grouped,
                &config.paths.results,
            )?;
            print_report(&score_file(&config.paths.results), json, &config)
        }
    }
}

fn init_config(global: bool, force: bool) -> Result<(), BenchError> {
    let path = if global {
        default_global_config_path().ok_or_else(|| {
            ConfigError::Invalid("unable to resolve the global config directory".to_string())
        })?
    } else {
        default_local_config_path()
    };
    match initialize_config_at_path(&path, force)? {
        ConfigInitResult::Created { path } => println!("Created {}", path.display()),
        ConfigInitResult::AlreadyInitialized { path } => println!(
            "{} already exists; pass --force to replace it",
            path.display()
        ),
        ConfigInitResult::Overwritten { path, backup_path } => println!(
            "Rewrote {} (previous file saved as {})",
            path.display(),
            backup_path.display()
        ),
    }
    Ok(())
}

fn apply_path_overrides(paths: &mut PathsConfig, overrides: cli::PathOverrides) {
    let cli::PathOverrides {
        benchmark,
        actions,
        grouped,
        results,
    } = overrides;
    if let Some(path) = benchmark {
        paths.benchmark = path;
    }
    if let Some(path) = actions {
        paths.actions = path;
    }
    if let Some(path) = grouped {
        paths.grouped = path;
    }
    if let Some(path) = results {
        paths.results = path;
    }
}

async fn run_benchmark(
    config: &Config,
    transcripts: Option<PathBuf>,
    flush_on_append: bool,
    agent: Vec<String>,
) -> Result<(), BenchError> {
    let argv = if agent.is_empty() {
        config.runner.command.clone()
    } else {
        agent
    };
    // An explicit --transcripts beats a configured command.
    let command = if transcripts.is_some() {
        None
    } else {
        CommandRuntime::from_argv(&argv)
    };
    match command {
        Some(runtime) => drive(runtime, config, flush_on_append).await,
        None => {
            let dir = transcripts.unwrap_or_else(|| config.runner.transcripts_dir.clone());
            drive(TranscriptRuntime::new(dir), config, flush_on_append).await
        }
    }
}

async fn drive<R: AgentRuntime>(
    runtime: R,
    config: &Config,
    flush_on_append: bool,
) -> Result<(), BenchError> {
    let tasks = load_benchmark(&config.paths.benchmark);
    if tasks.is_empty() {
        return Err(RunError::EmptyBenchmark(config.paths.benchmark.clone()).into());
    }

    let recorder = ActionRecorder::open(JsonFileStore::new(&config.paths.actions))
        .with_flush_on_append(flush_on_append || config.recorder.flush_on_append);
    let runner = TaskRunner::new(runtime, recorder)
        .with_system_prompt(config.runner.system_prompt.as_str())
        .with_context_limits(config.context.clone());
    let summary = runner.run_all(&tasks).await?;
    println!(
        "Recorded {} action(s) across {} task(s) into {}",
        summary.total_actions(),
        summary.outcomes.len(),
        config.paths.actions.display()
    );
    Ok(())
}

fn print_report(report: &ScoreReport, json: bool, config: &Config) -> Result<(), BenchError> {
    if json {
        let text = serde_json::to_string_pretty(report).map_err(StoreError::from)?;
        println!("{text}");
    } else {
        print!("{}", render_report(report, config.display.color));
    }
    Ok(())
}
