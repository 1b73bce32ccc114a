use crate::client::RequestClient;
use crate::config::PanelConfig;
use crate::error::{Error, Result};
use crate::event::{ChatEvent, ChatOutcome};
use crate::reduce::handle_chat_event;
use crate::state::ChatState;
use crate::types::{RunId, SessionKey};
use serde_json::{Value, json};
use std::sync::Arc;

/// A chat panel: its display state plus the gateway handle used to act on it.
///
/// Event reconciliation is synchronous; the model and session operations
/// suspend at the request boundary and borrow the panel mutably for the call.
pub struct ChatPanel {
    pub state: ChatState,
    client: Option<Arc<dyn RequestClient>>,
    config: PanelConfig,
}

impl ChatPanel {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            state: ChatState::new(SessionKey::new(config.session_key.clone())),
            client: None,
            config,
        }
    }

    pub fn with_client(mut self, client: Arc<dyn RequestClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_state(mut self, state: ChatState) -> Self {
        self.state = state;
        self
    }

    pub fn connect(&mut self, client: Arc<dyn RequestClient>) {
        self.client = Some(client);
    }

    pub fn disconnect(&mut self) {
        self.client = None;
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Reconcile one pushed event into the panel state.
    pub fn handle_event(&mut self, event: Option<&ChatEvent>) -> ChatOutcome {
        handle_chat_event(&mut self.state, event)
    }

    pub(crate) fn client(&self) -> Result<Arc<dyn RequestClient>> {
        self.client.clone().ok_or(Error::Disconnected)
    }

    pub(crate) fn chat_send_params(&self, message: &str, idempotency_key: &RunId) -> Value {
        json!({
            "sessionKey": self.state.session_key,
            "message": message,
            "deliver": false,
            "idempotencyKey": idempotency_key,
        })
    }
}
