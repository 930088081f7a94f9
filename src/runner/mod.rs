//! Drive an agent runtime over the benchmark task list.
//!
//! The runner owns the bookkeeping the agent should not care about: seeding
//! each task's history, attaching the shared [`ActionRecorder`], and
//! back-filling the task id once the agent is done with a task.

use crate::actions::ActionRecorder;
use crate::benchmark::BenchmarkTask;
use crate::error::{RunError, StoreError};
use crate::history::{ContextLimits, MessageHistory};
use crate::types::{Message, MessageLabel};
use async_trait::async_trait;
use tracing::{info, warn};

mod command;
mod transcript;

pub use command::CommandRuntime;
pub use transcript::TranscriptRuntime;

/// System prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a web-browsing agent that can perform searches, extract information, and take actions based on observations. Use the browser tool to interact with the web.";

/// The agent under test.
///
/// Implementations append whatever the agent produces to `history`; tool
/// calls reach the action log through the history's recorder. Whatever is
/// shown to the agent should be `history.history_view(limits)`.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run_task(
        &self,
        step: usize,
        task: &BenchmarkTask,
        history: &mut MessageHistory,
        limits: &ContextLimits,
    ) -> Result<(), RunError>;
}

/// Actions attributed to one task after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task: u32,
    pub actions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<TaskOutcome>,
}

impl RunSummary {
    pub fn total_actions(&self) -> usize {
        self.outcomes.iter().map(|o| o.actions).sum()
    }
}

/// Build the opening messages of a task: system prompt, objective, URL.
pub fn seed_history(
    recorder: ActionRecorder,
    system_prompt: &str,
    task: &BenchmarkTask,
) -> Result<MessageHistory, StoreError> {
    let mut history = MessageHistory::with_recorder(recorder);
    history.append(Message::system(system_prompt), Some(MessageLabel::System))?;
    history.append(
        Message::user(task.objective.as_str()),
        Some(MessageLabel::UserInput),
    )?;
    history.append(
        Message::user(format!("URL: {}", task.url)),
        Some(MessageLabel::UserInput),
    )?;
    Ok(history)
}

pub struct TaskRunner<R> {
    runtime: R,
    recorder: ActionRecorder,
    system_prompt: String,
    limits: ContextLimits,
}

impl<R: AgentRuntime> TaskRunner<R> {
    pub fn new(runtime: R, recorder: ActionRecorder) -> Self {
        Self {
            runtime,
            recorder,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            limits: ContextLimits::default(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        if !prompt.trim().is_empty() {
            self.system_prompt = prompt;
        }
        self
    }

    /// Per-label caps for the view handed to the agent.
    pub fn with_context_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn recorder(&self) -> &ActionRecorder {
        &self.recorder
    }

    /// Run every task in order; task ids are 1-based list positions.
    ///
    /// A task is back-filled and flushed even when its runtime fails, so its
    /// partial actions never leak into the next task. The failure then stops
    /// the run.
    pub async fn run_all(&self, tasks: &[BenchmarkTask]) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        for (idx, task) in tasks.iter().enumerate() {
            let step = idx + 1;
            let task_number = step as u32;
            info!(task = task_number, url = %task.url, "running task");

            let mut history = seed_history(self.recorder.clone(), &self.system_prompt, task)?;
            let outcome = self
                .runtime
                .run_task(step, task, &mut history, &self.limits)
                .await;

            let actions = self.recorder.assign_task(task_number);
            self.recorder.flush()?;
            if let Err(e) = outcome {
                warn!(task = task_number, error = %e, "agent runtime failed");
                return Err(e);
            }
            info!(
                task = task_number,
                actions,
                messages = history.len(),
                "task completed"
            );
            summary.outcomes.push(TaskOutcome {
                task: task_number,
                actions,
            });
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionStore, JsonFileStore, UNASSIGNED_TASK};
    use crate::testsupport::{benchmark_task_json, tool_call_message, TestTempDir};
    use serde_json::json;
    use std::sync::Mutex;

    /// Emits one tool call per desired action, named after the action.
    struct ScriptedRuntime {
        seen_seeds: Mutex<Vec<usize>>,
        seen_limits: Mutex<Vec<ContextLimits>>,
        fail_on: Option<usize>,
    }

    impl ScriptedRuntime {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                seen_seeds: Mutex::new(Vec::new()),
                seen_limits: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl AgentRuntime for ScriptedRuntime {
        async fn run_task(
            &self,
            step: usize,
            task: &BenchmarkTask,
            history: &mut MessageHistory,
            limits: &ContextLimits,
        ) -> Result<(), RunError> {
            self.seen_seeds.lock().unwrap().push(history.len());
            self.seen_limits.lock().unwrap().push(limits.clone());
            for (ordinal, kind) in &task.action {
                let arguments = json!({ "step": step, "ordinal": ordinal.as_str() });
                history.append(
                    tool_call_message(None, kind, arguments),
                    Some(MessageLabel::AgentModelResponse),
                )?;
            }
            if self.fail_on == Some(step) {
                return Err(RunError::Runtime {
                    step,
                    message: "browser crashed".into(),
                });
            }
            Ok(())
        }
    }

    fn tasks(specs: &[&[&str]]) -> Vec<BenchmarkTask> {
        specs
            .iter()
            .enumerate()
            .map(|(idx, actions)| {
                serde_json::from_value(benchmark_task_json(idx as u32 + 1, actions)).unwrap()
            })
            .collect()
    }

    #[test]
    fn seed_history_has_prompt_objective_and_url() {
        let task = &tasks(&[&["click"]])[0];
        let history = seed_history(ActionRecorder::in_memory(), "be brief", task).expect("seed");
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].first_text(), Some("be brief"));
        assert_eq!(history[0].label(), Some(MessageLabel::System));
        assert_eq!(history[1].first_text(), Some("objective 1"));
        assert_eq!(history[2].first_text(), Some("URL: https://example.test/1"));
        assert_eq!(history[2].label(), Some(MessageLabel::UserInput));
    }

    #[tokio::test]
    async fn run_all_backfills_task_ids_and_flushes() {
        let tmp = TestTempDir::new("runner");
        let path = tmp.child("agent_actions.json");
        let recorder = ActionRecorder::open(JsonFileStore::new(&path));
        let runner = TaskRunner::new(ScriptedRuntime::new(None), recorder.clone());

        let summary = runner
            .run_all(&tasks(&[&["click", "type"], &["scroll"]]))
            .await
            .expect("run");

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.outcomes[0], TaskOutcome { task: 1, actions: 2 });
        assert_eq!(summary.total_actions(), 3);
        assert_eq!(*runner.runtime.seen_seeds.lock().unwrap(), vec![3, 3]);
        assert_eq!(
            *runner.runtime.seen_limits.lock().unwrap(),
            vec![ContextLimits::default(); 2]
        );

        let on_disk = JsonFileStore::new(&path).load();
        let tasks: Vec<u32> = on_disk.iter().map(|r| r.task).collect();
        assert_eq!(tasks, vec![1, 1, 2]);
        assert!(on_disk.iter().all(|r| r.task != UNASSIGNED_TASK));
    }

    #[tokio::test]
    async fn failing_task_is_backfilled_before_error() {
        let recorder = ActionRecorder::in_memory();
        let runner = TaskRunner::new(ScriptedRuntime::new(Some(2)), recorder.clone());

        let err = runner
            .run_all(&tasks(&[&["click"], &["type"], &["scroll"]]))
            .await
            .expect_err("second task fails");

        assert!(matches!(err, RunError::Runtime { step: 2, .. }));
        let tasks: Vec<u32> = recorder.records().iter().map(|r| r.task).collect();
        assert_eq!(tasks, vec![1, 2]);
    }

    #[tokio::test]
    async fn configured_context_limits_reach_the_runtime() {
        let limits = ContextLimits::none()
            .with(MessageLabel::Screenshot, 3)
            .with(MessageLabel::AgentModelResponse, 0);
        let runner = TaskRunner::new(ScriptedRuntime::new(None), ActionRecorder::in_memory())
            .with_context_limits(limits.clone());

        runner
            .run_all(&tasks(&[&["click"], &["type"]]))
            .await
            .expect("run");
        assert_eq!(*runner.runtime.seen_limits.lock().unwrap(), vec![limits; 2]);
    }

    #[test]
    fn blank_system_prompt_keeps_default() {
        let runner = TaskRunner::new(ScriptedRuntime::new(None), ActionRecorder::in_memory())
            .with_system_prompt("  ");
        assert_eq!(runner.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }
}
