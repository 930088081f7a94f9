//! Shared test fixtures for history, recorder, and scoring test modules.

use crate::actions::ActionRecord;
use crate::types::{Message, ToolCall};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("navbench-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Convert a `json!` object literal into an argument map.
pub fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture arguments must be an object, got {other}"),
    }
}

/// Assistant message carrying a single tool call.
pub fn tool_call_message(text: Option<&str>, name: &str, arguments: Value) -> Message {
    Message::assistant(
        text,
        vec![ToolCall::function(
            format!("call_{name}"),
            name,
            args(arguments),
        )],
    )
}

/// Action record fixture with empty arguments.
pub fn record(tool_name: &str, task: u32) -> ActionRecord {
    ActionRecord {
        tool_name: tool_name.to_string(),
        arguments: Map::new(),
        message: String::new(),
        task,
    }
}

/// One benchmark task entry in the on-disk shape.
pub fn benchmark_task_json(step: u32, actions: &[&str]) -> Value {
    let action: Map<String, Value> = actions
        .iter()
        .enumerate()
        .map(|(idx, kind)| ((idx + 1).to_string(), json!(kind)))
        .collect();
    json!({
        "url": format!("https://example.test/{step}"),
        "objective": format!("objective {step}"),
        "step": step,
        "action": action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().join("nested").is_dir());
    }

    #[test]
    fn benchmark_fixture_uses_one_based_ordinals() {
        let task = benchmark_task_json(2, &["click", "type"]);
        assert_eq!(task["action"]["1"], "click");
        assert_eq!(task["action"]["2"], "type");
        assert_eq!(task["step"], 2);
    }
}
