//! Shared recorder handle that merges tool calls into the action log.

use super::record::{ActionLog, ActionRecord};
use super::store::{ActionStore, MemoryStore};
use crate::error::StoreError;
use crate::types::Message;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

struct RecorderState {
    log: ActionLog,
    store: Box<dyn ActionStore>,
    /// True when the log holds changes the store has not seen.
    dirty: bool,
    flush_on_append: bool,
}

impl RecorderState {
    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        self.store.save(self.log.records())?;
        self.dirty = false;
        debug!(records = self.log.len(), "flushed action store");
        Ok(())
    }
}

/// Cloneable handle to the run-wide action log.
///
/// The log lives in memory for the whole run and reaches the backing store
/// only on [`flush`](Self::flush), unless `flush_on_append` is enabled.
#[derive(Clone)]
pub struct ActionRecorder {
    state: Arc<Mutex<RecorderState>>,
}

impl ActionRecorder {
    /// Open a recorder seeded with whatever `store` already holds.
    pub fn open(store: impl ActionStore + 'static) -> Self {
        let existing = store.load();
        info!(records = existing.len(), "opened action store");
        Self {
            state: Arc::new(Mutex::new(RecorderState {
                log: ActionLog::from_records(existing),
                store: Box::new(store),
                dirty: false,
                flush_on_append: false,
            })),
        }
    }

    pub fn in_memory() -> Self {
        Self::open(MemoryStore::default())
    }

    /// Flush to the store after every [`record_history`](Self::record_history).
    pub fn with_flush_on_append(self, enabled: bool) -> Self {
        self.lock().flush_on_append = enabled;
        self
    }

    fn lock(&self) -> MutexGuard<'_, RecorderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge every tool call found in `messages`, returning how many were new.
    ///
    /// The whole slice is rescanned each time; calls already in the log are
    /// skipped by fingerprint. With `flush_on_append`, a failed write is
    /// returned after the merge; the records stay in memory and dirty.
    pub fn record_history(&self, messages: &[Message]) -> Result<usize, StoreError> {
        let mut state = self.lock();
        let added = state.log.merge(ActionRecord::candidates(messages));
        if added > 0 {
            state.dirty = true;
            debug!(added, total = state.log.len(), "recorded new tool calls");
        }
        if state.flush_on_append {
            state.flush().inspect_err(|e| {
                warn!(error = %e, "failed to flush action store after append");
            })?;
        }
        Ok(added)
    }

    /// Back-fill the task id on every unassigned record.
    pub fn assign_task(&self, task: u32) -> usize {
        let mut state = self.lock();
        let changed = state.log.assign_task(task);
        if changed > 0 {
            state.dirty = true;
        }
        info!(task, changed, "assigned task id to recorded actions");
        changed
    }

    /// Write pending changes to the backing store.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.lock().flush()
    }

    pub fn records(&self) -> Vec<ActionRecord> {
        self.lock().log.records().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ActionRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ActionRecorder")
            .field("records", &state.log.len())
            .field("dirty", &state.dirty)
            .field("flush_on_append", &state.flush_on_append)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::JsonFileStore;
    use crate::testsupport::{record, tool_call_message, TestTempDir};
    use serde_json::json;

    #[test]
    fn store_untouched_until_flush() {
        let store = MemoryStore::default();
        let recorder = ActionRecorder::open(store.clone());
        let messages = vec![tool_call_message(None, "click", json!({"mark_id": 1}))];
        assert_eq!(recorder.record_history(&messages).expect("record"), 1);
        assert!(store.records().is_empty());

        recorder.flush().expect("flush");
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn flush_on_append_writes_through() {
        let store = MemoryStore::default();
        let recorder = ActionRecorder::open(store.clone()).with_flush_on_append(true);
        recorder
            .record_history(&[tool_call_message(None, "type", json!({"text": "hi"}))])
            .expect("record");
        assert_eq!(store.records().len(), 1);
    }

    struct FailingStore;

    impl ActionStore for FailingStore {
        fn load(&self) -> Vec<ActionRecord> {
            Vec::new()
        }

        fn save(&mut self, _records: &[ActionRecord]) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "agent_actions.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn flush_on_append_reports_store_failure() {
        let recorder = ActionRecorder::open(FailingStore).with_flush_on_append(true);
        let err = recorder
            .record_history(&[tool_call_message(None, "click", json!({"mark_id": 2}))])
            .expect_err("write must fail");
        assert!(matches!(err, StoreError::Io { .. }), "{err}");
        assert_eq!(recorder.len(), 1);
        assert!(recorder.flush().is_err());
    }

    #[test]
    fn store_failure_without_write_through_surfaces_on_flush() {
        let recorder = ActionRecorder::open(FailingStore);
        let added = recorder
            .record_history(&[tool_call_message(None, "click", json!({"mark_id": 2}))])
            .expect("record");
        assert_eq!(added, 1);
        assert!(recorder.flush().is_err());
    }

    #[test]
    fn existing_records_suppress_duplicates() {
        let mut existing = record("click", 0);
        existing.arguments.insert("mark_id".into(), json!(7));
        let recorder = ActionRecorder::open(MemoryStore::with_records(vec![existing]));
        let added = recorder
            .record_history(&[tool_call_message(None, "click", json!({"mark_id": 7}))])
            .expect("record");
        assert_eq!(added, 0);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn assign_then_flush_persists_task_ids() {
        let tmp = TestTempDir::new("recorder-assign");
        let path = tmp.child("agent_actions.json");
        let recorder = ActionRecorder::open(JsonFileStore::new(&path));
        recorder
            .record_history(&[tool_call_message(None, "scroll", json!({}))])
            .expect("record");
        assert_eq!(recorder.assign_task(4), 1);
        recorder.flush().expect("flush");

        let reopened = ActionRecorder::open(JsonFileStore::new(&path));
        let records = reopened.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].task, 4);
    }

    #[test]
    fn string_encoded_arguments_survive_the_next_flush() {
        let tmp = TestTempDir::new("recorder-string-args");
        let path = tmp.write_text(
            "agent_actions.json",
            r#"[
                {"tool_name": "click", "arguments": {"x": 1}, "message": "", "task": 1},
                {"tool_name": "scroll", "arguments": "{\"dy\": 3}", "message": "", "task": 1},
                {"tool_name": "type", "arguments": {"text": "mug"}, "message": "", "task": 2}
            ]"#,
        );
        let recorder = ActionRecorder::open(JsonFileStore::new(&path));
        assert_eq!(recorder.len(), 3);

        recorder
            .record_history(&[tool_call_message(Some("done"), "return_value", json!({"value": 1}))])
            .expect("record");
        recorder.assign_task(3);
        recorder.flush().expect("flush");

        let stored = JsonFileStore::new(&path).load();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored[1].arguments["dy"], 3);
        assert_eq!(stored[3].task, 3);
    }
}
