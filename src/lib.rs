//! navbench: a benchmarking harness for web-browsing agents.
//!
//! Every tool call an agent emits is captured into a deduplicated action
//! log while the agent works through a list of benchmark tasks. Afterwards
//! the log is grouped per task, aligned position-by-position with each
//! task's desired actions, and scored per action type.
//!
//! # Quick start
//!
//! ```no_run
//! use navbench::actions::{ActionRecorder, JsonFileStore};
//! use navbench::benchmark::load_benchmark;
//! use navbench::runner::{TaskRunner, TranscriptRuntime};
//! use navbench::scoring::{align_files, group_file, render_report, score_file};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tasks = load_benchmark(Path::new("benchmarktasks.json"));
//! let recorder = ActionRecorder::open(JsonFileStore::new("agent_actions.json"));
//! TaskRunner::new(TranscriptRuntime::new("transcripts"), recorder)
//!     .run_all(&tasks)
//!     .await?;
//!
//! group_file(Path::new("agent_actions.json"), Path::new("grouped_agent_actions.json"))?;
//! align_files(
//!     Path::new("benchmarktasks.json"),
//!     Path::new("grouped_agent_actions.json"),
//!     Path::new("final_results.json"),
//! )?;
//! print!("{}", render_report(&score_file(Path::new("final_results.json")), false));
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod benchmark;
pub mod build_info;
pub mod config;
pub mod error;
pub mod history;
pub mod persist;
pub mod runner;
pub mod scoring;
#[cfg(test)]
pub mod testsupport;
pub mod types;
