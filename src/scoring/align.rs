//! Positional alignment of recorded actions against desired actions.

use super::group::GroupedActions;
use crate::actions::ActionRecord;
use crate::benchmark::{ActionSequence, BenchmarkTask, Ordinal};
use crate::error::StoreError;
use crate::persist::{read_json_or_default, write_json_pretty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Predicted vs. desired actions for one benchmark task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub chosen_action: ActionSequence,
    #[serde(default)]
    pub desired_action: ActionSequence,
    #[serde(default)]
    pub action_matched: BTreeMap<Ordinal, bool>,
}

/// One entry of the final results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskScore {
    pub task: u32,
    pub results: ScoreEntry,
}

/// Compare `recorded` against the task's desired actions by position.
///
/// The i-th recorded action fills ordinal `i` only while `i` is within both
/// sequences; ordinals past the recorded count stay absent and compare as
/// an empty string.
pub fn align_task(task: &BenchmarkTask, recorded: &[ActionRecord]) -> ScoreEntry {
    let desired_action = task.desired_actions();
    let chosen_action: ActionSequence = recorded
        .iter()
        .take(task.action.len())
        .enumerate()
        .map(|(idx, record)| {
            (
                Ordinal::from_position(idx + 1),
                record.tool_name.to_lowercase(),
            )
        })
        .collect();
    let action_matched = desired_action
        .iter()
        .map(|(ordinal, kind)| {
            let chosen = chosen_action.get(ordinal).map(String::as_str).unwrap_or("");
            (ordinal.clone(), chosen == kind)
        })
        .collect();

    ScoreEntry {
        objective: task.objective.clone(),
        url: task.url.clone(),
        chosen_action,
        desired_action,
        action_matched,
    }
}

/// Align every benchmark task with the recorded actions of the same number.
pub fn align(benchmark: &[BenchmarkTask], grouped: &GroupedActions) -> Vec<TaskScore> {
    benchmark
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let task_number = (idx + 1) as u32;
            let recorded = grouped.get(task_number);
            debug!(
                task = task_number,
                recorded = recorded.len(),
                desired = task.action.len(),
                "aligning task"
            );
            TaskScore {
                task: task_number,
                results: align_task(task, recorded),
            }
        })
        .collect()
}

pub fn load_results(path: &Path) -> Vec<TaskScore> {
    read_json_or_default(path)
}

pub fn save_results(path: &Path, results: &[TaskScore]) -> Result<(), StoreError> {
    write_json_pretty(path, results)?;
    info!(path = %path.display(), tasks = results.len(), "saved final results");
    Ok(())
}
