//! Ordered conversation log with tool-call recording and context windowing.
//!
//! Every [`MessageHistory::append`] hands the full message list to the
//! attached [`ActionRecorder`], so tool calls reach the action log no matter
//! which message introduced them. [`MessageHistory::history_view`] produces
//! the trimmed copy that is actually shown to a model.

use crate::actions::ActionRecorder;
use crate::error::{HistoryError, StoreError};
use crate::types::{Message, MessageLabel};
use serde_json::Value;
use std::collections::BTreeSet;
use std::ops::{Add, AddAssign, Index};

mod view;

pub use view::{ContextLimits, DEFAULT_SCREENSHOT_LIMIT};

/// Conversation state owned by one task run.
#[derive(Debug, Clone, Default)]
pub struct MessageHistory {
    messages: Vec<Message>,
    recorder: Option<ActionRecorder>,
}

impl MessageHistory {
    /// An empty history that records nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty history whose appends feed `recorder`.
    pub fn with_recorder(recorder: ActionRecorder) -> Self {
        Self {
            messages: Vec::new(),
            recorder: Some(recorder),
        }
    }

    /// A detached history holding `messages`.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            recorder: None,
        }
    }

    pub fn recorder(&self) -> Option<&ActionRecorder> {
        self.recorder.as_ref()
    }

    /// Append `message`, optionally relabelling it, then merge tool calls.
    ///
    /// The message is kept even when the recorder fails to write through to
    /// its store; that failure is returned.
    pub fn append(
        &mut self,
        mut message: Message,
        label: Option<MessageLabel>,
    ) -> Result<(), StoreError> {
        if label.is_some() {
            message.set_label(label);
        }
        self.messages.push(message);
        if let Some(recorder) = &self.recorder {
            recorder.record_history(&self.messages)?;
        }
        Ok(())
    }

    /// Remove and return the newest message.
    pub fn pop(&mut self) -> Result<Message, HistoryError> {
        self.messages.pop().ok_or(HistoryError::Empty)
    }

    /// Append `other`'s messages after ours without recording them.
    pub fn extend(&mut self, other: MessageHistory) {
        self.messages.extend(other.messages);
    }

    /// Serialize every message, dropping the named top-level fields.
    pub fn to_dict(&self, exclude: &BTreeSet<&str>) -> Vec<Value> {
        self.messages
            .iter()
            .map(|message| {
                let mut value = serde_json::to_value(message).unwrap_or(Value::Null);
                if let Value::Object(map) = &mut value {
                    map.retain(|key, _| !exclude.contains(key.as_str()));
                }
                value
            })
            .collect()
    }

    /// Bounded copy for presentation: at most `cap` of each capped label,
    /// newest first; uncapped messages always survive.
    ///
    /// The returned history is detached from the recorder.
    pub fn history_view(&self, limits: &ContextLimits) -> MessageHistory {
        MessageHistory::from_messages(view::apply_limits(&self.messages, limits))
    }

    /// Detached copy with messages in reverse order.
    pub fn reversed(&self) -> MessageHistory {
        MessageHistory::from_messages(self.messages.iter().rev().cloned().collect())
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Index<usize> for MessageHistory {
    type Output = Message;

    fn index(&self, index: usize) -> &Message {
        &self.messages[index]
    }
}

impl<'a> IntoIterator for &'a MessageHistory {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Concatenation yields a detached history.
impl Add for MessageHistory {
    type Output = MessageHistory;

    fn add(self, other: MessageHistory) -> MessageHistory {
        let mut combined = MessageHistory::from_messages(self.messages);
        combined.extend(other);
        combined
    }
}

impl AddAssign for MessageHistory {
    fn add_assign(&mut self, other: MessageHistory) {
        self.extend(other);
    }
}
