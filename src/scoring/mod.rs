//! Scoring pipeline: group → align → aggregate → report.
//!
//! Each stage reads and writes plain JSON artifacts so a run can be scored
//! again later without re-running the agent.

pub mod align;
pub mod group;
pub mod metrics;
pub mod report;

pub use align::{align, align_task, load_results, save_results, ScoreEntry, TaskScore};
pub use group::{GroupedActions, TaskActions};
pub use metrics::{compute_report, ActionType, ScoreReport, TypeCounts};
pub use report::{percent, render_report};

use crate::actions::{ActionStore, JsonFileStore};
use crate::benchmark::load_benchmark;
use crate::error::StoreError;
use std::path::Path;
use tracing::info;

/// Read the flat action log at `actions` and write it grouped to `grouped`.
pub fn group_file(actions: &Path, grouped: &Path) -> Result<GroupedActions, StoreError> {
    let records = JsonFileStore::new(actions).load();
    let groups = GroupedActions::from_records(&records);
    info!(records = records.len(), groups = groups.len(), "grouped action log");
    groups.save(grouped)?;
    Ok(groups)
}

/// Align the grouped file against the benchmark and write the results file.
pub fn align_files(
    benchmark: &Path,
    grouped: &Path,
    results: &Path,
) -> Result<Vec<TaskScore>, StoreError> {
    let tasks = load_benchmark(benchmark);
    let scores = align(&tasks, &GroupedActions::load(grouped));
    save_results(results, &scores)?;
    Ok(scores)
}

/// Aggregate metrics over a results file; a missing file scores as empty.
pub fn score_file(results: &Path) -> ScoreReport {
    compute_report(&load_results(results))
}
