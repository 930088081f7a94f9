//! Human-readable console report.

use super::metrics::{ActionType, ScoreReport};
use crossterm::style::Stylize;

/// Format a ratio as a percentage with two decimals (`0.5` → `50.00%`).
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Render the full report; headings are bold when `color` is set.
///
/// Each section is preceded by a blank line and the text ends in a newline.
pub fn render_report(report: &ScoreReport, color: bool) -> String {
    let heading = |text: String| -> String {
        if color {
            text.bold().to_string()
        } else {
            text
        }
    };

    let mut lines: Vec<String> = Vec::new();
    for kind in ActionType::ALL {
        let counts = report.counts(kind);
        let name = kind.display_name();
        lines.extend([
            String::new(),
            heading(format!(
                "Total number of desired '{name}' actions: {}",
                counts.desired
            )),
            format!(
                "Total number of predicted '{name}' actions: {}",
                counts.predicted
            ),
            format!("Number of matching '{name}' actions: {}", counts.matched),
            format!("'{name}' Recall: {}", percent(counts.recall())),
            format!("'{name}' Precision: {}", percent(counts.precision())),
            format!("'{name}' F1-Score: {}", percent(counts.f1())),
        ]);
    }

    let micro = report.micro();
    lines.extend([
        String::new(),
        heading(format!(
            "Total number of evaluated actions: {}",
            report.total_actions
        )),
        format!("Number of matching actions: {}", report.matching_actions),
        format!(
            "Number of non-matching actions: {}",
            report.non_matching_actions()
        ),
        format!("Accuracy: {}", percent(report.accuracy())),
        format!("Micro-averaged Recall: {}", percent(micro.recall())),
        format!("Micro-averaged Precision: {}", percent(micro.precision())),
        format!("Micro-averaged F1-Score: {}", percent(micro.f1())),
    ]);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
