//! Chat events pushed by the gateway, and the outcome signal of reconciling one.

use crate::message::{Message, MessageParseError};
use crate::types::{RunId, SessionKey, Timestamp, now_millis};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatEventState {
    Delta,
    Final,
    Aborted,
    Error,
}

/// Wire shape of a `chat` event as the transport receives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEventPayload {
    pub run_id: String,
    pub session_key: String,
    pub state: ChatEventState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

pub type ParsedMessage = Result<Message, MessageParseError>;

#[derive(Debug)]
pub enum ChatEventKind {
    Delta { message: Option<ParsedMessage> },
    Final { message: Option<ParsedMessage> },
    Aborted { message: Option<ParsedMessage> },
    Error { error_message: Option<String> },
}

/// A chat event after the message it carries has been validated.
#[derive(Debug)]
pub struct ChatEvent {
    pub run_id: RunId,
    pub session_key: SessionKey,
    pub kind: ChatEventKind,
    /// When the transport handed the event over; stamps synthesized messages.
    pub received_at: Timestamp,
}

impl ChatEvent {
    pub fn new(session_key: SessionKey, run_id: RunId, kind: ChatEventKind) -> Self {
        Self {
            run_id,
            session_key,
            kind,
            received_at: now_millis(),
        }
    }

    pub fn with_received_at(mut self, received_at: Timestamp) -> Self {
        self.received_at = received_at;
        self
    }

    /// Validate a wire payload. Malformed messages are kept as parse errors
    /// rather than rejected, since the reconciler decides how to recover.
    pub fn from_payload(payload: ChatEventPayload) -> Self {
        let message = payload.message.as_ref().map(Message::parse);
        let kind = match payload.state {
            ChatEventState::Delta => ChatEventKind::Delta { message },
            ChatEventState::Final => ChatEventKind::Final { message },
            ChatEventState::Aborted => ChatEventKind::Aborted { message },
            ChatEventState::Error => ChatEventKind::Error {
                error_message: payload.error_message,
            },
        };
        Self::new(
            SessionKey::new(payload.session_key),
            RunId::new(payload.run_id),
            kind,
        )
    }

    /// Decode and validate a raw JSON event in one step.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let payload: ChatEventPayload = serde_json::from_value(value)?;
        Ok(Self::from_payload(payload))
    }

    pub fn state(&self) -> ChatEventState {
        match self.kind {
            ChatEventKind::Delta { .. } => ChatEventState::Delta,
            ChatEventKind::Final { .. } => ChatEventState::Final,
            ChatEventKind::Aborted { .. } => ChatEventState::Aborted,
            ChatEventKind::Error { .. } => ChatEventState::Error,
        }
    }
}

/// What reconciling an event means for the session as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatOutcome {
    /// No session-level transition; re-render at most.
    None,
    Final,
    Aborted,
    Error,
}

impl ChatOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ChatOutcome::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_payload() {
        let event = ChatEvent::from_json(json!({
            "runId": "run-1",
            "sessionKey": "main",
            "state": "final",
            "message": { "role": "assistant", "content": [{ "type": "text", "text": "Done" }] }
        }))
        .expect("decode");

        assert_eq!(event.run_id, RunId::new("run-1"));
        assert_eq!(event.session_key, SessionKey::new("main"));
        assert_eq!(event.state(), ChatEventState::Final);
        match event.kind {
            ChatEventKind::Final {
                message: Some(Ok(message)),
            } => assert_eq!(message.text().as_deref(), Some("Done")),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn malformed_message_is_kept_as_parse_error() {
        let event = ChatEvent::from_json(json!({
            "runId": "run-1",
            "sessionKey": "main",
            "state": "aborted",
            "message": "not-an-assistant-message"
        }))
        .expect("decode");

        assert!(matches!(
            event.kind,
            ChatEventKind::Aborted {
                message: Some(Err(MessageParseError::NotAnObject { .. }))
            }
        ));
    }

    #[test]
    fn null_message_counts_as_absent() {
        let event = ChatEvent::from_json(json!({
            "runId": "run-1",
            "sessionKey": "main",
            "state": "delta",
            "message": null
        }))
        .expect("decode");

        assert!(matches!(event.kind, ChatEventKind::Delta { message: None }));
    }

    #[test]
    fn error_event_carries_error_message() {
        let event = ChatEvent::from_json(json!({
            "runId": "run-1",
            "sessionKey": "main",
            "state": "error",
            "errorMessage": "rate limited"
        }))
        .expect("decode");

        match event.kind {
            ChatEventKind::Error { error_message } => {
                assert_eq!(error_message.as_deref(), Some("rate limited"));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!(
            ChatEvent::from_json(json!({
                "runId": "run-1",
                "sessionKey": "main",
                "state": "paused"
            }))
            .is_err()
        );
    }

    #[test]
    fn outcome_display_matches_wire_names() {
        assert_eq!(ChatOutcome::Final.to_string(), "final");
        assert_eq!(ChatOutcome::None.to_string(), "none");
        assert!(ChatOutcome::Aborted.is_terminal());
        assert!(!ChatOutcome::None.is_terminal());
    }
}
