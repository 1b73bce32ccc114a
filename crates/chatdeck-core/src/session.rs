//! Sending, aborting and reloading the chat transcript of a panel.

use crate::error::Error;
use crate::message::Message;
use crate::panel::ChatPanel;
use crate::types::{RunId, now_millis};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<Value>,
    #[serde(default)]
    thinking_level: Option<String>,
}

impl ChatPanel {
    /// Replace the transcript with the gateway's history for this session.
    pub async fn load_chat_history(&mut self) {
        let Ok(client) = self.client() else {
            tracing::debug!(target: "chatdeck.session", "Skipping history load while disconnected");
            return;
        };

        self.state.chat_loading = true;
        self.state.last_error = None;

        let method = self.config().methods.history.clone();
        let params = json!({
            "sessionKey": self.state.session_key,
            "limit": self.config().history_limit,
        });

        let response = client.request(&method, params).await;
        let history = response.and_then(|response| {
            serde_json::from_value::<HistoryResponse>(response)
                .map_err(|source| Error::Decode { method, source })
        });

        match history {
            Ok(history) => {
                self.state.chat_messages = history
                    .messages
                    .iter()
                    .filter_map(|raw| match Message::parse(raw) {
                        Ok(message) => Some(message),
                        Err(err) => {
                            tracing::warn!(target: "chatdeck.session", error = %err, "Dropping malformed history entry");
                            None
                        }
                    })
                    .collect();
                self.state.chat_thinking_level = history.thinking_level;
            }
            Err(err) => {
                tracing::warn!(target: "chatdeck.session", error = %err, "Failed to load chat history");
                self.state.last_error = Some(err.to_string());
            }
        }

        self.state.chat_loading = false;
    }

    /// Send a user message and make its run the one this panel streams.
    ///
    /// Returns the new run id, or `None` if nothing was sent or the send failed.
    pub async fn send_chat_message(&mut self, text: &str) -> Option<RunId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let Ok(client) = self.client() else {
            tracing::debug!(target: "chatdeck.session", "Cannot send while disconnected");
            return None;
        };

        let now = now_millis();
        self.state.chat_messages.push(Message::user_text(text, now));
        self.state.chat_sending = true;
        self.state.last_error = None;

        let run_id = RunId::generate();
        self.state.start_run(run_id.clone(), now);

        let params = self.chat_send_params(text, &run_id);
        let result = client.request(&self.config().methods.send, params).await;
        self.state.chat_sending = false;

        match result {
            Ok(_) => {
                tracing::debug!(target: "chatdeck.session", run_id = %run_id, "Chat message sent");
                Some(run_id)
            }
            Err(err) => {
                tracing::warn!(target: "chatdeck.session", error = %err, "Failed to send chat message");
                let error = err.to_string();
                self.state.clear_run();
                self.state
                    .chat_messages
                    .push(Message::assistant_text(format!("Error: {error}"), now_millis()));
                self.state.last_error = Some(error);
                None
            }
        }
    }

    /// Ask the gateway to stop the current run.
    ///
    /// Streaming state is released by the `aborted` event that follows, not here.
    pub async fn abort_chat_run(&mut self) -> bool {
        let Ok(client) = self.client() else {
            return false;
        };

        let mut params = json!({ "sessionKey": self.state.session_key });
        if let Some(run_id) = &self.state.chat_run_id {
            params["runId"] = json!(run_id);
        }

        match client.request(&self.config().methods.abort, params).await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(target: "chatdeck.session", error = %err, "Failed to abort run");
                self.state.last_error = Some(err.to_string());
                false
            }
        }
    }
}
