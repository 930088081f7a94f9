//! Action records and the deduplicating in-memory log.

use crate::types::Message;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Task id carried by records whose run has not finished yet.
pub const UNASSIGNED_TASK: u32 = 0;

/// One persisted tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRecord {
    pub tool_name: String,
    #[serde(default, deserialize_with = "crate::types::deserialize_arguments")]
    pub arguments: Map<String, Value>,
    /// First text part of the assistant message that issued the call.
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub task: u32,
}

/// Canonical digest of all four record fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ActionRecord {
    /// Digest of the record's canonical JSON (object keys sorted).
    pub fn fingerprint(&self) -> Fingerprint {
        let canonical = json!({
            "tool_name": self.tool_name,
            "arguments": self.arguments,
            "message": self.message,
            "task": self.task,
        });
        let digest = Sha256::digest(canonical.to_string().as_bytes());
        Fingerprint(format!("{digest:x}"))
    }

    /// Build unassigned candidates for every tool call in `messages`.
    pub fn candidates(messages: &[Message]) -> Vec<ActionRecord> {
        messages
            .iter()
            .flat_map(|message| {
                let text = message.first_text().unwrap_or_default();
                message.tool_calls().iter().map(move |call| ActionRecord {
                    tool_name: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                    message: text.to_string(),
                    task: UNASSIGNED_TASK,
                })
            })
            .collect()
    }
}

/// Insertion-ordered record list with set-membership by fingerprint.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
    seen: HashSet<Fingerprint>,
}

impl ActionLog {
    /// Adopt previously persisted records verbatim, duplicates included.
    pub fn from_records(records: Vec<ActionRecord>) -> Self {
        let seen = records.iter().map(ActionRecord::fingerprint).collect();
        Self { records, seen }
    }

    /// Append `record` unless an identical one is already present.
    pub fn insert(&mut self, record: ActionRecord) -> bool {
        if !self.seen.insert(record.fingerprint()) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Insert every candidate, returning how many were new.
    pub fn merge(&mut self, candidates: impl IntoIterator<Item = ActionRecord>) -> usize {
        let mut added = 0;
        for record in candidates {
            if self.insert(record) {
                added += 1;
            }
        }
        added
    }

    /// Rewrite every unassigned record to `task`, returning how many changed.
    pub fn assign_task(&mut self, task: u32) -> usize {
        let mut changed = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.task == UNASSIGNED_TASK)
        {
            record.task = task;
            changed += 1;
        }
        if changed > 0 {
            self.seen = self.records.iter().map(ActionRecord::fingerprint).collect();
        }
        changed
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
