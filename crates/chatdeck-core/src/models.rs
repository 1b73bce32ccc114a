//! Model catalog loading and model switching for a panel.

use crate::client::CatalogEntry;
use crate::error::{Error, Result};
use crate::panel::ChatPanel;
use crate::state::ModelOption;
use crate::types::RunId;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogResponse {
    Wrapped {
        #[serde(default)]
        models: Vec<CatalogEntry>,
    },
    Bare(Vec<CatalogEntry>),
}

impl CatalogResponse {
    fn into_entries(self) -> Vec<CatalogEntry> {
        match self {
            CatalogResponse::Wrapped { models } | CatalogResponse::Bare(models) => models,
        }
    }
}

/// Picker options for a catalog: addressable entries only, first occurrence
/// of each `provider/model` kept, sorted by value.
pub fn model_options(entries: &[CatalogEntry]) -> Vec<ModelOption> {
    let mut seen = HashSet::new();
    let mut options: Vec<ModelOption> = entries
        .iter()
        .filter_map(CatalogEntry::to_option)
        .filter(|option| seen.insert(option.value.clone()))
        .collect();
    options.sort_by(|a, b| a.value.cmp(&b.value));
    options
}

/// The chat command that switches the session to `model_value`.
pub fn model_command(model_value: &str) -> String {
    format!("/model {model_value}")
}

impl ChatPanel {
    /// Refresh `chat_model_options` from the gateway catalog.
    ///
    /// Failures land in `chat_model_error`; previously loaded options are kept.
    pub async fn load_chat_models(&mut self) {
        self.state.chat_model_loading = true;
        self.state.chat_model_error = None;

        match self.fetch_model_options().await {
            Ok(options) => {
                tracing::debug!(target: "chatdeck.models", count = options.len(), "Loaded model catalog");
                self.state.chat_model_options = options;
            }
            Err(err) => {
                tracing::warn!(target: "chatdeck.models", error = %err, "Failed to load model catalog");
                self.state.chat_model_error = Some(err.to_string());
            }
        }

        self.state.chat_model_loading = false;
    }

    /// Ask the gateway to switch this session to `model_value`.
    ///
    /// Returns whether the switch was accepted; transport failures never escape.
    pub async fn switch_chat_model(&mut self, model_value: &str) -> bool {
        let model_value = model_value.trim();
        if model_value.is_empty() {
            tracing::debug!(target: "chatdeck.models", "Ignoring switch to an empty model value");
            return false;
        }

        self.state.chat_switching_model = true;
        let result = self.send_model_command(model_value).await;
        self.state.chat_switching_model = false;

        match result {
            Ok(()) => {
                tracing::info!(target: "chatdeck.models", model = %model_value, "Switched model");
                self.state.chat_selected_model = Some(model_value.to_string());
                // The gateway answers the command in the transcript.
                self.load_chat_history().await;
                true
            }
            Err(err) => {
                tracing::warn!(
                    target: "chatdeck.models",
                    model = %model_value,
                    error = %err,
                    "Failed to switch model"
                );
                false
            }
        }
    }

    async fn fetch_model_options(&self) -> Result<Vec<ModelOption>> {
        let client = self.client()?;
        let method = &self.config().methods.models;
        let response = client.request(method, json!({})).await?;
        let catalog: CatalogResponse =
            serde_json::from_value(response).map_err(|source| Error::Decode {
                method: method.clone(),
                source,
            })?;
        Ok(model_options(&catalog.into_entries()))
    }

    async fn send_model_command(&self, model_value: &str) -> Result<()> {
        let client = self.client()?;
        let params: Value = self.chat_send_params(&model_command(model_value), &RunId::generate());
        client.request(&self.config().methods.send, params).await?;
        Ok(())
    }
}
