//! Conversation data model shared by the history log and the agent runtime.
//!
//! These types serialize to the chat-message JSON shapes emitted by
//! OpenAI-compatible agent runtimes: `role`-tagged messages whose content is a
//! list of `text` / `image_url` parts.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Roles and labels
// ---------------------------------------------------------------------------

/// Conversation participant role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Semantic label attached to a message, used by context-window limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageLabel {
    System,
    UserInput,
    Screenshot,
    AgentModelResponse,
}

impl MessageLabel {
    /// Every label, in declaration order.
    pub const ALL: [MessageLabel; 4] = [
        Self::System,
        Self::UserInput,
        Self::Screenshot,
        Self::AgentModelResponse,
    ];

    /// Wire name used in JSON payloads and config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::UserInput => "user_input",
            Self::Screenshot => "screenshot",
            Self::AgentModelResponse => "agent_model_response",
        }
    }

    /// Parse a wire name back into a label.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == name.trim())
    }
}

// ---------------------------------------------------------------------------
// Content parts
// ---------------------------------------------------------------------------

/// Image reference; usually a `data:` URL carrying base64 JPEG bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageUrl {
    pub url: String,
}

/// One content part of a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::ImageUrl { .. } => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageUrl> {
        match self {
            Self::ImageUrl { image_url } => Some(image_url),
            Self::Text { .. } => None,
        }
    }
}

/// Image payload accepted by [`Message::from_media`].
#[derive(Debug, Clone, Copy)]
pub enum ImageData<'a> {
    /// Raw image bytes; base64-encoded on construction.
    Bytes(&'a [u8]),
    /// Already base64-encoded image data.
    Base64(&'a str),
}

// ---------------------------------------------------------------------------
// Tool calls
// ---------------------------------------------------------------------------

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

/// Function name and decoded arguments of a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// Accepts either a JSON object or a JSON-encoded object string.
    #[serde(default, deserialize_with = "deserialize_arguments")]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }
}

/// Tool arguments as an object, or a JSON string holding one.
pub(crate) fn deserialize_arguments<'de, D>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::String(raw) if raw.trim().is_empty() => Ok(Map::new()),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(serde::de::Error::custom(format!(
                "tool call arguments string is not a JSON object: {raw}"
            ))),
        },
        other => Err(serde::de::Error::custom(format!(
            "tool call arguments must be an object, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single conversational turn.
///
/// The role is the variant, so it cannot change after construction, and only
/// assistant turns can carry tool calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        #[serde(default)]
        label: Option<MessageLabel>,
        #[serde(default)]
        content: Vec<MessageContent>,
    },
    User {
        #[serde(default)]
        label: Option<MessageLabel>,
        #[serde(default)]
        content: Vec<MessageContent>,
    },
    Assistant {
        #[serde(default)]
        label: Option<MessageLabel>,
        #[serde(default)]
        content: Vec<MessageContent>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        #[serde(default)]
        label: Option<MessageLabel>,
        #[serde(default)]
        content: Vec<MessageContent>,
        tool_call_id: String,
    },
}

impl Message {
    /// Create a system message with one text part.
    pub fn system(text: impl Into<String>) -> Self {
        Self::System {
            label: None,
            content: vec![MessageContent::text(text)],
        }
    }

    /// Create a user message with one text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            label: None,
            content: vec![MessageContent::text(text)],
        }
    }

    /// Create an assistant message; `text` is omitted when `None`.
    pub fn assistant(text: Option<&str>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            label: None,
            content: text.map(MessageContent::text).into_iter().collect(),
            tool_calls,
        }
    }

    /// Create a tool result message answering `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Tool {
            label: None,
            content: vec![MessageContent::text(text)],
            tool_call_id: tool_call_id.into(),
        }
    }

    /// Build a user message from optional text and an optional image.
    ///
    /// Images become `data:image/jpeg;base64,...` URLs placed after the text.
    pub fn from_media(text: Option<&str>, image: Option<ImageData<'_>>) -> Self {
        let mut content = Vec::new();
        if let Some(text) = text {
            content.push(MessageContent::text(text));
        }
        if let Some(image) = image {
            let encoded = match image {
                ImageData::Bytes(bytes) => BASE64_STANDARD.encode(bytes),
                ImageData::Base64(encoded) => encoded.to_string(),
            };
            content.push(MessageContent::image(format!(
                "data:image/jpeg;base64,{encoded}"
            )));
        }
        Self::User {
            label: None,
            content,
        }
    }

    /// Return the same message with `label` set.
    pub fn with_label(mut self, label: MessageLabel) -> Self {
        self.set_label(Some(label));
        self
    }

    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    pub fn label(&self) -> Option<MessageLabel> {
        match self {
            Self::System { label, .. }
            | Self::User { label, .. }
            | Self::Assistant { label, .. }
            | Self::Tool { label, .. } => *label,
        }
    }

    pub fn set_label(&mut self, new_label: Option<MessageLabel>) {
        match self {
            Self::System { label, .. }
            | Self::User { label, .. }
            | Self::Assistant { label, .. }
            | Self::Tool { label, .. } => *label = new_label,
        }
    }

    pub fn content(&self) -> &[MessageContent] {
        match self {
            Self::System { content, .. }
            | Self::User { content, .. }
            | Self::Assistant { content, .. }
            | Self::Tool { content, .. } => content,
        }
    }

    /// Tool calls requested by this message; empty for non-assistant roles.
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            Self::System { .. } | Self::User { .. } | Self::Tool { .. } => &[],
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content().iter().filter_map(MessageContent::as_text)
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageUrl> {
        self.content().iter().filter_map(MessageContent::as_image)
    }

    pub fn first_text(&self) -> Option<&str> {
        self.texts().next()
    }

    pub fn first_image(&self) -> Option<&ImageUrl> {
        self.images().next()
    }

    /// Number of content parts.
    pub fn len(&self) -> usize {
        self.content().len()
    }

    pub fn is_empty(&self) -> bool {
        self.content().is_empty()
    }
}
