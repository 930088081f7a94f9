//! Replay pre-recorded agent transcripts.

use super::AgentRuntime;
use crate::benchmark::BenchmarkTask;
use crate::error::RunError;
use crate::history::{ContextLimits, MessageHistory};
use crate::types::Message;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads `<dir>/task-<step>.json`, a JSON array of messages, and appends each
/// message to the task history in order.
///
/// A missing transcript means the agent did nothing for that task. Context
/// limits do not apply; a transcript is already what the agent produced.
#[derive(Debug, Clone)]
pub struct TranscriptRuntime {
    dir: PathBuf,
}

impl TranscriptRuntime {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn transcript_path(&self, step: usize) -> PathBuf {
        self.dir.join(format!("task-{step}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl AgentRuntime for TranscriptRuntime {
    async fn run_task(
        &self,
        step: usize,
        _task: &BenchmarkTask,
        history: &mut MessageHistory,
        _limits: &ContextLimits,
    ) -> Result<(), RunError> {
        let path = self.transcript_path(step);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "no transcript for task");
                return Ok(());
            }
            Err(e) => {
                return Err(RunError::Runtime {
                    step,
                    message: format!("failed to read {}: {e}", path.display()),
                })
            }
        };
        let messages: Vec<Message> =
            serde_json::from_str(&text).map_err(|e| RunError::Runtime {
                step,
                message: format!("invalid transcript {}: {e}", path.display()),
            })?;
        debug!(path = %path.display(), messages = messages.len(), "replaying transcript");
        for message in messages {
            history.append(message, None)?;
        }
        Ok(())
    }
}
