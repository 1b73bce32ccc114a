use crate::message::Message;
use crate::types::{RunId, SessionKey, Timestamp};
use serde::{Deserialize, Serialize};

/// One selectable entry of the model picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    /// `provider/model`, also the argument of the `/model` command.
    pub value: String,
    pub label: String,
}

/// Display state of one chat panel.
///
/// Owned by the UI session and mutated in place for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub session_key: SessionKey,

    pub chat_run_id: Option<RunId>,
    pub chat_stream: Option<String>,
    pub chat_stream_started_at: Option<Timestamp>,
    pub chat_messages: Vec<Message>,

    pub chat_loading: bool,
    pub chat_sending: bool,
    pub chat_thinking_level: Option<String>,
    pub last_error: Option<String>,

    pub chat_model_options: Vec<ModelOption>,
    pub chat_model_loading: bool,
    pub chat_model_error: Option<String>,
    pub chat_selected_model: Option<String>,
    pub chat_switching_model: bool,
}

impl ChatState {
    pub fn new(session_key: SessionKey) -> Self {
        Self {
            session_key,
            chat_run_id: None,
            chat_stream: None,
            chat_stream_started_at: None,
            chat_messages: Vec::new(),
            chat_loading: false,
            chat_sending: false,
            chat_thinking_level: None,
            last_error: None,
            chat_model_options: Vec::new(),
            chat_model_loading: false,
            chat_model_error: None,
            chat_selected_model: None,
            chat_switching_model: false,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.chat_run_id.is_some()
    }

    pub fn is_own_run(&self, run_id: &RunId) -> bool {
        self.chat_run_id.as_ref() == Some(run_id)
    }

    /// Mark `run_id` as the run this panel streams.
    pub fn start_run(&mut self, run_id: RunId, started_at: Timestamp) {
        self.chat_run_id = Some(run_id);
        self.chat_stream = Some(String::new());
        self.chat_stream_started_at = Some(started_at);
    }

    /// Release streaming state once the own run is over.
    pub fn clear_run(&mut self) {
        self.chat_run_id = None;
        self.chat_stream = None;
        self.chat_stream_started_at = None;
    }
}
