//! Context-window limits applied by [`MessageHistory::history_view`].
//!
//! [`MessageHistory::history_view`]: super::MessageHistory::history_view

use crate::types::{Message, MessageLabel};
use std::collections::BTreeMap;

/// Default cap: only the most recent screenshot reaches the model.
pub const DEFAULT_SCREENSHOT_LIMIT: usize = 1;

/// Per-label maximum number of retained messages.
///
/// Labels without an entry are never dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLimits {
    caps: BTreeMap<MessageLabel, usize>,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self::none().with(MessageLabel::Screenshot, DEFAULT_SCREENSHOT_LIMIT)
    }
}

impl ContextLimits {
    /// No caps at all; a view keeps every message.
    pub fn none() -> Self {
        Self {
            caps: BTreeMap::new(),
        }
    }

    pub fn with(mut self, label: MessageLabel, max: usize) -> Self {
        self.caps.insert(label, max);
        self
    }

    pub fn get(&self, label: MessageLabel) -> Option<usize> {
        self.caps.get(&label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MessageLabel, usize)> + '_ {
        self.caps.iter().map(|(label, max)| (*label, *max))
    }
}

impl FromIterator<(MessageLabel, usize)> for ContextLimits {
    fn from_iter<I: IntoIterator<Item = (MessageLabel, usize)>>(iter: I) -> Self {
        Self {
            caps: iter.into_iter().collect(),
        }
    }
}

/// Keep the newest `cap` messages of each capped label, in original order.
pub(super) fn apply_limits(messages: &[Message], limits: &ContextLimits) -> Vec<Message> {
    let mut kept_per_label: BTreeMap<MessageLabel, usize> = BTreeMap::new();
    let mut kept = Vec::with_capacity(messages.len());
    for message in messages.iter().rev() {
        let capped = message
            .label()
            .and_then(|label| limits.get(label).map(|max| (label, max)));
        match capped {
            Some((label, max)) => {
                let count = kept_per_label.entry(label).or_insert(0);
                if *count < max {
                    *count += 1;
                    kept.push(message.clone());
                }
            }
            None => kept.push(message.clone()),
        }
    }
    kept.reverse();
    kept
}
