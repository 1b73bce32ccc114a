//! Reconciles gateway chat events into [`ChatState`].
//!
//! Several runs can share one event channel (the user's own run plus
//! announcements from sub-agents), but only the run recorded in
//! `chat_run_id` may drive the streaming fields. Every branch below checks
//! run ownership before it touches them.

use crate::event::{ChatEvent, ChatEventKind, ChatOutcome, ParsedMessage};
use crate::message::Message;
use crate::state::ChatState;
use crate::types::Timestamp;

const DEFAULT_ERROR_MESSAGE: &str = "chat error";

/// By-value reducer: consumes the state and returns it with the outcome.
pub fn reduce(mut state: ChatState, event: Option<&ChatEvent>) -> (ChatState, ChatOutcome) {
    let outcome = handle_chat_event(&mut state, event);
    (state, outcome)
}

/// In-place form of [`reduce`] for callers that keep the state behind a `&mut`.
pub fn handle_chat_event(state: &mut ChatState, event: Option<&ChatEvent>) -> ChatOutcome {
    let Some(event) = event else {
        return ChatOutcome::None;
    };

    if event.session_key != state.session_key {
        tracing::debug!(
            target: "chatdeck.reduce",
            expected = %state.session_key,
            received = %event.session_key,
            "Ignoring chat event for another session"
        );
        return ChatOutcome::None;
    }

    let is_own_run = state.is_own_run(&event.run_id);

    match &event.kind {
        ChatEventKind::Delta { message } => {
            if is_own_run {
                handle_delta(state, message.as_ref())
            } else {
                ignore_foreign(event)
            }
        }
        ChatEventKind::Final { message } => handle_final(state, is_own_run, message.as_ref()),
        ChatEventKind::Aborted { message } => {
            if is_own_run {
                handle_aborted(state, message.as_ref(), event.received_at)
            } else {
                ignore_foreign(event)
            }
        }
        ChatEventKind::Error { error_message } => {
            if is_own_run {
                handle_error(state, error_message.as_deref())
            } else {
                ignore_foreign(event)
            }
        }
    }
}

fn ignore_foreign(event: &ChatEvent) -> ChatOutcome {
    tracing::debug!(
        target: "chatdeck.reduce",
        run_id = %event.run_id,
        state = %event.state(),
        "Ignoring event from a run this panel does not own"
    );
    ChatOutcome::None
}

fn handle_delta(state: &mut ChatState, message: Option<&ParsedMessage>) -> ChatOutcome {
    let next = match message {
        Some(Ok(message)) => message.text(),
        Some(Err(err)) => {
            tracing::warn!(target: "chatdeck.reduce", error = %err, "Dropping malformed delta");
            None
        }
        None => None,
    };

    // Deltas carry the cumulative reply; a shorter late delta must not rewind it.
    if let Some(next) = next {
        let current = state.chat_stream.as_deref().unwrap_or_default();
        if current.is_empty() || next.len() >= current.len() {
            state.chat_stream = Some(next);
        }
    }

    ChatOutcome::None
}

fn handle_final(
    state: &mut ChatState,
    is_own_run: bool,
    message: Option<&ParsedMessage>,
) -> ChatOutcome {
    let message = match message {
        Some(Ok(message)) => Some(message.clone()),
        Some(Err(err)) => {
            tracing::warn!(target: "chatdeck.reduce", error = %err, "Dropping malformed final message");
            None
        }
        None => None,
    };

    if !is_own_run {
        // Announcement from another run: show it, leave our stream alone.
        return match message {
            Some(message) => {
                state.chat_messages.push(message);
                ChatOutcome::None
            }
            None => ChatOutcome::Final,
        };
    }

    if let Some(message) = message {
        state.chat_messages.push(message);
    }
    state.clear_run();
    ChatOutcome::Final
}

fn handle_aborted(
    state: &mut ChatState,
    message: Option<&ParsedMessage>,
    received_at: Timestamp,
) -> ChatOutcome {
    let partial = match message {
        Some(Ok(message)) => match message.clone().into_assistant() {
            Ok(assistant) if has_visible_text(&assistant) => Some(assistant),
            Ok(_) => streamed_partial(state, received_at),
            Err(err) => {
                tracing::debug!(target: "chatdeck.reduce", error = %err, "Keeping streamed text for aborted run");
                streamed_partial(state, received_at)
            }
        },
        Some(Err(err)) => {
            tracing::warn!(target: "chatdeck.reduce", error = %err, "Aborted run sent a malformed message");
            streamed_partial(state, received_at)
        }
        None => streamed_partial(state, received_at),
    };

    if let Some(partial) = partial {
        state.chat_messages.push(partial);
    }
    state.clear_run();
    ChatOutcome::Aborted
}

fn handle_error(state: &mut ChatState, error_message: Option<&str>) -> ChatOutcome {
    let error_message = error_message.unwrap_or(DEFAULT_ERROR_MESSAGE);
    tracing::warn!(target: "chatdeck.reduce", error = %error_message, "Run failed");
    state.last_error = Some(error_message.to_string());
    state.clear_run();
    ChatOutcome::Error
}

fn streamed_partial(state: &ChatState, received_at: Timestamp) -> Option<Message> {
    let streamed = state.chat_stream.as_deref().unwrap_or_default();
    if streamed.is_empty() {
        return None;
    }
    Some(Message::assistant_text(streamed, received_at))
}

fn has_visible_text(message: &Message) -> bool {
    message
        .text()
        .is_some_and(|text| !text.trim().is_empty())
}
