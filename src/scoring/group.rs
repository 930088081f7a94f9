//! Partition the flat action log by task id.

use crate::actions::ActionRecord;
use crate::error::StoreError;
use crate::persist::{read_json_or_default, write_json_pretty};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// All records of one task, in original log order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskActions {
    pub task: u32,
    pub results: Vec<ActionRecord>,
}

/// Records grouped by task; groups appear in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedActions {
    groups: Vec<TaskActions>,
}

impl GroupedActions {
    pub fn from_records(records: &[ActionRecord]) -> Self {
        let mut groups: Vec<TaskActions> = Vec::new();
        for record in records {
            match groups.iter_mut().find(|g| g.task == record.task) {
                Some(group) => group.results.push(record.clone()),
                None => groups.push(TaskActions {
                    task: record.task,
                    results: vec![record.clone()],
                }),
            }
        }
        Self { groups }
    }

    /// Recorded actions for `task`; empty when the task has none.
    ///
    /// If a loaded file repeats a task id, the last entry wins.
    pub fn get(&self, task: u32) -> &[ActionRecord] {
        self.groups
            .iter()
            .rev()
            .find(|g| g.task == task)
            .map(|g| g.results.as_slice())
            .unwrap_or_default()
    }

    pub fn groups(&self) -> &[TaskActions] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn load(path: &Path) -> Self {
        read_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json_pretty(path, self)?;
        info!(path = %path.display(), groups = self.len(), "saved grouped actions");
        Ok(())
    }
}
