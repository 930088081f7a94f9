//! Run an external agent process per task.

use super::AgentRuntime;
use crate::benchmark::BenchmarkTask;
use crate::error::RunError;
use crate::history::{ContextLimits, MessageHistory};
use crate::types::Message;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Spawns `program args...` once per task.
///
/// The task is passed through `NAVBENCH_TASK_URL`, `NAVBENCH_TASK_OBJECTIVE`
/// and `NAVBENCH_TASK_STEP`. Stdin receives one JSON line: the capped view of
/// the seeded history as an array of message objects, after which stdin is
/// closed. An agent that never reads stdin is fine.
///
/// Every stdout line that parses as a message is appended to the history as
/// soon as it arrives; other lines are logged and skipped. A non-zero exit
/// fails the task.
#[derive(Debug, Clone)]
pub struct CommandRuntime {
    program: String,
    args: Vec<String>,
}

impl CommandRuntime {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a full argv; `None` when `argv` is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl AgentRuntime for CommandRuntime {
    async fn run_task(
        &self,
        step: usize,
        task: &BenchmarkTask,
        history: &mut MessageHistory,
        limits: &ContextLimits,
    ) -> Result<(), RunError> {
        let runtime_error = |message: String| RunError::Runtime { step, message };

        let view = history.history_view(limits).to_dict(&BTreeSet::new());
        let mut payload = serde_json::to_vec(&view)
            .map_err(|e| runtime_error(format!("failed to encode history view: {e}")))?;
        payload.push(b'\n');

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("NAVBENCH_TASK_URL", &task.url)
            .env("NAVBENCH_TASK_OBJECTIVE", &task.objective)
            .env("NAVBENCH_TASK_STEP", step.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| runtime_error(format!("failed to spawn `{}`: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| runtime_error("agent stdin was not captured".into()))?;
        let writer = tokio::spawn(async move {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| runtime_error("agent stdout was not captured".into()))?;
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| runtime_error(format!("failed to read agent output: {e}")))?
        {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Message>(trimmed) {
                Ok(message) => history.append(message, None)?,
                Err(e) => debug!(step, error = %e, "skipping non-message output line"),
            }
        }

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(step, "agent closed stdin before reading the history view");
            }
            Ok(Err(e)) => return Err(runtime_error(format!("failed to write agent stdin: {e}"))),
            Err(e) => return Err(runtime_error(format!("stdin writer failed: {e}"))),
        }

        let status = child
            .wait()
            .await
            .map_err(|e| runtime_error(format!("failed to wait for agent: {e}")))?;
        if !status.success() {
            warn!(step, %status, "agent process exited unsuccessfully");
            return Err(runtime_error(format!("agent exited with {status}")));
        }
        Ok(())
    }
}
