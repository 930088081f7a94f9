//! Per-action-type and overall precision/recall/F1.

use super::align::TaskScore;
use serde::Serialize;
use std::fmt;

/// Action types tracked individually in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Click,
    Type,
    ReturnValue,
    Scroll,
}

impl ActionType {
    /// Report order.
    pub const ALL: [ActionType; 4] = [Self::Click, Self::Type, Self::ReturnValue, Self::Scroll];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Type => "type",
            Self::ReturnValue => "return_value",
            Self::Scroll => "scroll",
        }
    }

    /// Classify a lowercased action label; unknown labels are `None`.
    pub fn classify(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == label)
    }

    /// Position in [`ActionType::ALL`].
    fn index(self) -> usize {
        self as usize
    }

    /// Capitalized name used in report headings (`Return_value`).
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Click => "Click",
            Self::Type => "Type",
            Self::ReturnValue => "Return_value",
            Self::Scroll => "Scroll",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Harmonic mean of recall and precision, or 0 when both are 0.
pub fn f1(recall: f64, precision: f64) -> f64 {
    let sum = recall + precision;
    if sum > 0.0 {
        2.0 * recall * precision / sum
    } else {
        0.0
    }
}

/// Counters for one action type (or a pooled set of types).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    /// Desired actions of this type.
    pub desired: usize,
    /// Predicted actions of this type, matched or not.
    pub predicted: usize,
    /// Desired actions of this type whose ordinal matched.
    pub matched: usize,
}

impl TypeCounts {
    pub fn recall(&self) -> f64 {
        ratio(self.matched, self.desired)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.matched, self.predicted)
    }

    pub fn f1(&self) -> f64 {
        f1(self.recall(), self.precision())
    }

    fn absorb(&mut self, other: &TypeCounts) {
        self.desired += other.desired;
        self.predicted += other.predicted;
        self.matched += other.matched;
    }
}

/// Aggregate metrics over a full results set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreReport {
    /// Counters in [`ActionType::ALL`] order.
    pub per_type: [TypeCounts; 4],
    /// Every evaluated ordinal, whatever its type.
    pub total_actions: usize,
    pub matching_actions: usize,
}

impl ScoreReport {
    pub fn counts(&self, kind: ActionType) -> &TypeCounts {
        &self.per_type[kind.index()]
    }

    fn counts_mut(&mut self, kind: ActionType) -> &mut TypeCounts {
        &mut self.per_type[kind.index()]
    }

    pub fn non_matching_actions(&self) -> usize {
        self.total_actions - self.matching_actions
    }

    /// Global matched / evaluated ratio; unknown action types count here.
    pub fn accuracy(&self) -> f64 {
        ratio(self.matching_actions, self.total_actions)
    }

    /// Counters pooled across the four named types only.
    pub fn micro(&self) -> TypeCounts {
        let mut pooled = TypeCounts::default();
        for counts in &self.per_type {
            pooled.absorb(counts);
        }
        pooled
    }
}

/// Accumulate counters over every aligned task.
pub fn compute_report(results: &[TaskScore]) -> ScoreReport {
    let mut report = ScoreReport::default();
    for score in results {
        let entry = &score.results;
        report.total_actions += entry.action_matched.len();
        report.matching_actions += entry.action_matched.values().filter(|m| **m).count();

        for (ordinal, label) in &entry.desired_action {
            if let Some(kind) = ActionType::classify(label) {
                let counts = report.counts_mut(kind);
                counts.desired += 1;
                if entry.action_matched.get(ordinal).copied().unwrap_or(false) {
                    counts.matched += 1;
                }
            }
        }
        for label in entry.chosen_action.values() {
            if let Some(kind) = ActionType::classify(label) {
                report.counts_mut(kind).predicted += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::{ActionSequence, Ordinal};
    use crate::scoring::align::ScoreEntry;
    use std::collections::BTreeMap;

    fn seq(pairs: &[(&str, &str)]) -> ActionSequence {
        pairs
            .iter()
            .map(|(k, v)| (Ordinal::from(*k), v.to_string()))
            .collect()
    }

    fn score(desired: &[(&str, &str)], chosen: &[(&str, &str)]) -> TaskScore {
        let desired_action = seq(desired);
        let chosen_action = seq(chosen);
        let action_matched: BTreeMap<Ordinal, bool> = desired_action
            .iter()
            .map(|(k, v)| (k.clone(), chosen_action.get(k) == Some(v)))
            .collect();
        TaskScore {
            task: 1,
            results: ScoreEntry {
                objective: String::new(),
                url: String::new(),
                chosen_action,
                desired_action,
                action_matched,
            },
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn single_task_accuracy_is_half() {
        let report = compute_report(&[score(
            &[("1", "click"), ("2", "type")],
            &[("1", "click"), ("2", "scroll")],
        )]);
        assert_eq!(report.total_actions, 2);
        assert_eq!(report.matching_actions, 1);
        assert_eq!(report.non_matching_actions(), 1);
        assert_close(report.accuracy(), 0.5);
        assert_eq!(report.counts(ActionType::Scroll).predicted, 1);
        assert_eq!(report.counts(ActionType::Type).desired, 1);
        assert_eq!(report.counts(ActionType::Type).matched, 0);
    }

    #[test]
    fn click_precision_recall_f1() {
        let counts = TypeCounts {
            desired: 4,
            predicted: 5,
            matched: 2,
        };
        assert_close(counts.recall(), 0.5);
        assert_close(counts.precision(), 0.4);
        assert_close(counts.f1(), 2.0 * 0.5 * 0.4 / 0.9);
    }

    #[test]
    fn zero_denominators_yield_zero() {
        let counts = TypeCounts::default();
        assert_eq!(counts.recall(), 0.0);
        assert_eq!(counts.precision(), 0.0);
        assert_eq!(counts.f1(), 0.0);
        let report = compute_report(&[]);
        assert_eq!(report.accuracy(), 0.0);
        assert_eq!(report.micro().f1(), 0.0);
    }

    #[test]
    fn unknown_types_count_for_accuracy_but_not_micro() {
        let report = compute_report(&[score(
            &[("1", "hover"), ("2", "click")],
            &[("1", "hover"), ("2", "click")],
        )]);
        assert_eq!(report.total_actions, 2);
        assert_eq!(report.matching_actions, 2);
        let micro = report.micro();
        assert_eq!(micro.desired, 1);
        assert_eq!(micro.predicted, 1);
        assert_eq!(micro.matched, 1);
    }

    #[test]
    fn missing_prediction_counts_as_miss() {
        let report = compute_report(&[score(
            &[("1", "click"), ("2", "return_value")],
            &[("1", "click")],
        )]);
        let rv = report.counts(ActionType::ReturnValue);
        assert_eq!(rv.desired, 1);
        assert_eq!(rv.predicted, 0);
        assert_eq!(rv.recall(), 0.0);
        assert_close(report.accuracy(), 0.5);
    }

    #[test]
    fn classify_accepts_only_named_types() {
        assert_eq!(ActionType::classify("return_value"), Some(ActionType::ReturnValue));
        assert_eq!(ActionType::classify("Click"), None);
        assert_eq!(ActionType::classify("navigate"), None);
    }
}
