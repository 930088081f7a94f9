//! Benchmark task definitions authored offline.
//!
//! The benchmark file is a JSON array; a task's id is its 1-based position
//! in that array, not any field inside it.

use crate::persist::read_json_or_default;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::info;

/// 1-based action position used as the alignment key.
///
/// Stored as the string key found in JSON. Numeric keys sort numerically so
/// `"10"` follows `"9"`; non-numeric keys sort after them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ordinal(String);

impl Ordinal {
    /// Ordinal for the 1-based `position`.
    pub fn from_position(position: usize) -> Self {
        Self(position.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<&str> for Ordinal {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for Ordinal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Ordinal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordinal → action-type mapping.
pub type ActionSequence = BTreeMap<Ordinal, String>;

/// One benchmark task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTask {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub objective: String,
    /// Informational only. Integers and numeric strings are accepted;
    /// anything else reads as `None` rather than rejecting the file.
    #[serde(
        default,
        deserialize_with = "deserialize_step",
        skip_serializing_if = "Option::is_none"
    )]
    pub step: Option<u32>,
    /// Desired action type per ordinal, as authored.
    pub action: ActionSequence,
}

impl BenchmarkTask {
    /// Desired actions with every type lowercased.
    pub fn desired_actions(&self) -> ActionSequence {
        self.action
            .iter()
            .map(|(ordinal, kind)| (ordinal.clone(), kind.to_lowercase()))
            .collect()
    }
}

fn deserialize_step<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let step = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    };
    Ok(step)
}

/// Load the task list; missing or malformed files yield no tasks.
pub fn load_benchmark(path: &Path) -> Vec<BenchmarkTask> {
    let tasks: Vec<BenchmarkTask> = read_json_or_default(path);
    info!(path = %path.display(), tasks = tasks.len(), "loaded benchmark");
    tasks
}
