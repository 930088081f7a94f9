//! Backing stores for the action record log.

use super::record::ActionRecord;
use crate::error::StoreError;
use crate::persist::{move_to_backup, read_json, write_json_pretty, JsonRead};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// Durable storage behind an [`ActionRecorder`](super::ActionRecorder).
///
/// `load` never fails: a missing or unreadable store is an empty store.
pub trait ActionStore: Send {
    fn load(&self) -> Vec<ActionRecord>;
    fn save(&mut self, records: &[ActionRecord]) -> Result<(), StoreError>;
}

/// JSON array of records on disk (`agent_actions.json` by default).
///
/// A file that exists but does not decode loads as empty and is moved to a
/// timestamped `.bak` sibling before the next save replaces it.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    unusable: Cell<bool>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            unusable: Cell::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActionStore for JsonFileStore {
    fn load(&self) -> Vec<ActionRecord> {
        match read_json(&self.path) {
            JsonRead::Loaded(records) => {
                self.unusable.set(false);
                records
            }
            JsonRead::Missing => Vec::new(),
            JsonRead::Unusable(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "action store does not decode; it will be backed up before the next save"
                );
                self.unusable.set(true);
                Vec::new()
            }
        }
    }

    fn save(&mut self, records: &[ActionRecord]) -> Result<(), StoreError> {
        if self.unusable.get() {
            if let Some(backup) = move_to_backup(&self.path)? {
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "moved undecodable action store aside"
                );
            }
            self.unusable.set(false);
        }
        write_json_pretty(&self.path, records)
    }
}

/// In-memory store; clones share the same backing vector.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<ActionRecord>>>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<ActionRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Snapshot of the last saved records.
    pub fn records(&self) -> Vec<ActionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ActionStore for MemoryStore {
    fn load(&self) -> Vec<ActionRecord> {
        self.records()
    }

    fn save(&mut self, records: &[ActionRecord]) -> Result<(), StoreError> {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records.to_vec();
        Ok(())
    }
}
