//! Chat message types and the validated parse boundary.
//!
//! Messages arrive from the gateway as loosely shaped JSON. [`Message::parse`]
//! turns a raw value into a typed [`Message`] or a [`MessageParseError`], so the
//! reconciler only ever matches on parse outcomes instead of probing JSON.

use crate::types::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

/// Author of a message. Roles other than `user` and `assistant` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "user".to_string(),
            Role::Assistant => "assistant".to_string(),
            Role::Other(other) => other,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
            Role::Other(other) => f.write_str(other),
        }
    }
}

/// Content block types the panel understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KnownBlock {
    Text(TextBlock),
    Thinking(ThinkingBlock),
}

/// A `text` block. Fields beyond `text` (signatures, annotations) ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingBlock {
    pub thinking: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

impl ThinkingBlock {
    pub fn new(thinking: impl Into<String>) -> Self {
        Self {
            thinking: thinking.into(),
            extra: Map::new(),
        }
    }
}

/// One entry of a message's `content` array.
///
/// Blocks of a type the panel does not render (tool calls, images, ...) are
/// carried as raw JSON so they survive being appended to the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Known(KnownBlock),
    Unknown(Value),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Known(KnownBlock::Text(TextBlock::new(text)))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Known(KnownBlock::Text(block)) => Some(&block.text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(deserialize_with = "deserialize_content")]
    pub content: Vec<ContentBlock>,
    /// Kept as the gateway sent it; some senders emit fractional millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Number>,
    /// Fields the panel does not interpret (usage, stop reasons, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum MessageParseError {
    #[error("expected a message object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected an assistant message, found role {role}")]
    NotAssistant { role: Role },
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentBlock>, timestamp: Option<Timestamp>) -> Self {
        Self {
            role,
            content,
            timestamp: timestamp.map(Number::from),
            extra: Map::new(),
        }
    }

    pub fn user_text(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(Role::User, vec![ContentBlock::text(text)], Some(timestamp))
    }

    pub fn assistant_text(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(
            Role::Assistant,
            vec![ContentBlock::text(text)],
            Some(timestamp),
        )
    }

    /// Parse a raw gateway value into a message.
    pub fn parse(value: &Value) -> Result<Self, MessageParseError> {
        if !value.is_object() {
            return Err(MessageParseError::NotAnObject {
                found: json_kind(value),
            });
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Narrow to an assistant-authored message.
    pub fn into_assistant(self) -> Result<Self, MessageParseError> {
        if self.role == Role::Assistant {
            Ok(self)
        } else {
            Err(MessageParseError::NotAssistant { role: self.role })
        }
    }

    /// The timestamp as whole epoch millis. Fractions are truncated; negative or
    /// non-finite values read as `None`.
    pub fn timestamp_millis(&self) -> Option<Timestamp> {
        let timestamp = self.timestamp.as_ref()?;
        timestamp.as_u64().or_else(|| {
            timestamp
                .as_f64()
                .filter(|millis| millis.is_finite() && *millis >= 0.0)
                .map(|millis| millis as u64)
        })
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Concatenated text blocks, or `None` when the message has no text at all.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Content {
        Plain(String),
        Blocks(Vec<ContentBlock>),
    }

    Ok(match Content::deserialize(deserializer)? {
        Content::Plain(text) => vec![ContentBlock::text(text)],
        Content::Blocks(blocks) => blocks,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_text_blocks_and_keeps_unknown_fields() {
        let raw = json!({
            "role": "assistant",
            "content": [{ "type": "text", "text": "Reply" }],
            "timestamp": 101,
            "stopReason": "end_turn"
        });

        let message = Message::parse(&raw).expect("parse");
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text().as_deref(), Some("Reply"));
        assert_eq!(message.timestamp_millis(), Some(101));
        assert_eq!(message.extra.get("stopReason"), Some(&json!("end_turn")));
        assert_eq!(serde_json::to_value(&message).expect("serialize"), raw);
    }

    #[test]
    fn block_signatures_survive_a_round_trip() {
        let raw = json!({
            "role": "assistant",
            "content": [
                { "type": "thinking", "thinking": "hmm", "thinkingSignature": "sig-0" },
                { "type": "text", "text": "Partial", "textSignature": "sig-1" }
            ],
            "timestamp": 7
        });

        let message = Message::parse(&raw).expect("parse");
        assert_eq!(message.text().as_deref(), Some("Partial"));
        assert!(matches!(
            &message.content[1],
            ContentBlock::Known(KnownBlock::Text(block))
                if block.extra.get("textSignature") == Some(&json!("sig-1"))
        ));
        assert_eq!(serde_json::to_value(&message).expect("serialize"), raw);
    }

    #[test]
    fn fractional_timestamps_do_not_invalidate_the_message() {
        let raw = json!({
            "role": "assistant",
            "content": [{ "type": "text", "text": "Done" }],
            "timestamp": 1_700_000_000_000.5
        });

        let message = Message::parse(&raw).expect("parse");
        assert_eq!(message.timestamp_millis(), Some(1_700_000_000_000));
        assert_eq!(serde_json::to_value(&message).expect("serialize"), raw);

        let negative = Message::parse(&json!({ "role": "user", "content": "x", "timestamp": -3 }))
            .expect("parse");
        assert_eq!(negative.timestamp_millis(), None);
    }

    #[test]
    fn plain_string_content_becomes_one_text_block() {
        let message =
            Message::parse(&json!({ "role": "user", "content": "Hi" })).expect("parse");
        assert_eq!(message.content, vec![ContentBlock::text("Hi")]);
        assert_eq!(message.timestamp_millis(), None);
    }

    #[test]
    fn unknown_blocks_are_carried_through() {
        let tool_block = json!({ "type": "toolCall", "id": "t1", "name": "read" });
        let message = Message::parse(&json!({
            "role": "assistant",
            "content": [{ "type": "thinking", "thinking": "hmm" }, tool_block.clone()]
        }))
        .expect("parse");

        assert_eq!(
            message.content[0],
            ContentBlock::Known(KnownBlock::Thinking(ThinkingBlock::new("hmm")))
        );
        assert_eq!(message.content[1], ContentBlock::Unknown(tool_block));
        assert_eq!(message.text(), None);
    }

    #[test]
    fn other_roles_round_trip_verbatim() {
        let message =
            Message::parse(&json!({ "role": "toolResult", "content": [] })).expect("parse");
        assert_eq!(message.role, Role::Other("toolResult".to_string()));
        assert_eq!(
            serde_json::to_value(&message).expect("serialize")["role"],
            json!("toolResult")
        );
    }

    #[test]
    fn rejects_non_objects_and_missing_content() {
        assert!(matches!(
            Message::parse(&json!("not-an-assistant-message")),
            Err(MessageParseError::NotAnObject { found: "a string" })
        ));
        assert!(matches!(
            Message::parse(&json!({ "role": "assistant" })),
            Err(MessageParseError::Malformed(_))
        ));
    }

    #[test]
    fn into_assistant_rejects_other_roles() {
        let user = Message::user_text("unexpected", 1);
        assert!(matches!(
            user.into_assistant(),
            Err(MessageParseError::NotAssistant { role: Role::User })
        ));
    }

    #[test]
    fn text_joins_multiple_blocks() {
        let message = Message::new(
            Role::Assistant,
            vec![ContentBlock::text("one"), ContentBlock::text("two")],
            None,
        );
        assert_eq!(message.text().as_deref(), Some("one\ntwo"));
    }
}
