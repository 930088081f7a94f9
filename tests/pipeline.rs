//! End-to-end: replay transcripts, back-fill task ids, group, align, score.

use navbench::actions::{ActionRecorder, ActionStore, JsonFileStore, UNASSIGNED_TASK};
use navbench::benchmark::load_benchmark;
use navbench::history::{ContextLimits, MessageHistory};
use navbench::runner::{TaskRunner, TranscriptRuntime};
use navbench::scoring::{
    align_files, group_file, load_results, render_report, score_file, ActionType, GroupedActions,
};
use navbench::types::{Message, MessageLabel};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "navbench-it-{name}-{}-{nanos}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    fn write(&self, relative: &str, value: serde_json::Value) -> PathBuf {
        let path = self.0.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
        path
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn assistant_call(id: &str, name: &str, text: &str, arguments: serde_json::Value) -> serde_json::Value {
    json!({
        "role": "assistant",
        "label": "agent_model_response",
        "content": [{"type": "text", "text": text}],
        "tool_calls": [{
            "id": id,
            "type": "function",
            "function": {"name": name, "arguments": arguments.to_string()}
        }]
    })
}

fn screenshot(n: u32) -> serde_json::Value {
    json!({
        "role": "user",
        "label": "screenshot",
        "content": [{"type": "image_url", "image_url": {"url": format!("data:image/jpeg;base64,{n}")}}]
    })
}

#[tokio::test]
async fn recorded_run_scores_per_action_type() {
    let tmp = TempDir::new("pipeline");
    let benchmark = tmp.write(
        "benchmarktasks.json",
        json!([
            {
                "url": "https://shop.example/",
                "objective": "Add the red mug to the cart",
                "step": 1,
                "action": {"1": "Click", "2": "Type", "3": "Click"}
            },
            {
                "url": "https://news.example/",
                "objective": "Report the top headline",
                "step": 2,
                "action": {"1": "Scroll", "2": "Return_value"}
            }
        ]),
    );
    tmp.write(
        "transcripts/task-1.json",
        json!([
            screenshot(1),
            assistant_call("a", "click", "open search", json!({"x": 10, "y": 20})),
            screenshot(2),
            assistant_call("b", "type", "search mug", json!({"text": "red mug"})),
            assistant_call("c", "scroll", "look further", json!({"dy": 300}))
        ]),
    );
    tmp.write(
        "transcripts/task-2.json",
        json!([
            assistant_call("d", "scroll", "", json!({"dy": 200})),
            assistant_call("e", "return_value", "found it", json!({"value": "Headline"}))
        ]),
    );

    let actions = tmp.path().join("agent_actions.json");
    let grouped = tmp.path().join("grouped_agent_actions.json");
    let results = tmp.path().join("final_results.json");

    let tasks = load_benchmark(&benchmark);
    let recorder = ActionRecorder::open(JsonFileStore::new(&actions));
    let summary = TaskRunner::new(TranscriptRuntime::new(tmp.path().join("transcripts")), recorder)
        .run_all(&tasks)
        .await
        .expect("run");
    assert_eq!(summary.total_actions(), 5);

    let stored = JsonFileStore::new(&actions).load();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|r| r.task != UNASSIGNED_TASK));
    assert_eq!(stored[1].arguments["text"], "red mug");
    assert_eq!(stored[1].message, "search mug");

    let groups = group_file(&actions, &grouped).expect("group");
    assert_eq!(groups.get(1).len(), 3);
    assert_eq!(GroupedActions::load(&grouped), groups);

    align_files(&benchmark, &grouped, &results).expect("align");
    let scores = load_results(&results);
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].results.objective, "Add the red mug to the cart");

    let report = score_file(&results);
    assert_eq!(report.total_actions, 5);
    // Task 1: click ok, type ok, scroll vs click miss. Task 2: both ok.
    assert_eq!(report.matching_actions, 4);
    let click = report.counts(ActionType::Click);
    assert_eq!((click.desired, click.predicted, click.matched), (2, 1, 1));
    assert_eq!(report.counts(ActionType::Scroll).predicted, 2);

    let text = render_report(&report, false);
    assert!(text.contains("Accuracy: 80.00%"), "{text}");
    assert!(text.contains("'Click' Recall: 50.00%"), "{text}");
}

#[test]
fn history_view_keeps_only_the_latest_screenshot() {
    let mut history = MessageHistory::new();
    history
        .append(Message::system("prompt"), Some(MessageLabel::System))
        .expect("append");
    for n in 0..3 {
        history
            .append(Message::user(format!("shot {n}")), Some(MessageLabel::Screenshot))
            .expect("append");
        history
            .append(Message::user(format!("note {n}")), None)
            .expect("append");
    }

    let view = history.history_view(&ContextLimits::default());
    let texts: Vec<&str> = view.iter().filter_map(|m| m.first_text()).collect();
    assert_eq!(texts, vec!["prompt", "note 0", "note 1", "shot 2", "note 2"]);
    assert_eq!(history.len(), 7);
}
