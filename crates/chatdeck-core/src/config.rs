use crate::client::CatalogEntry;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SESSION_KEY: &str = "main";
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Gateway method names the panel calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayMethods {
    pub models: String,
    pub send: String,
    pub history: String,
    pub abort: String,
}

impl Default for GatewayMethods {
    fn default() -> Self {
        Self {
            models: "models.list".to_string(),
            send: "chat.send".to_string(),
            history: "chat.history".to_string(),
            abort: "chat.abort".to_string(),
        }
    }
}

/// Panel configuration, normally read from a TOML file.
///
/// ```toml
/// session_key = "main"
/// history_limit = 200
///
/// [methods]
/// models = "models.list"
///
/// [[models]]
/// provider = "github-copilot"
/// model = "gpt-5.2"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub session_key: String,
    pub history_limit: usize,
    pub methods: GatewayMethods,
    /// Static catalog used when no gateway is attached.
    pub models: Vec<CatalogEntry>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            methods: GatewayMethods::default(),
            models: Vec::new(),
        }
    }
}

impl PanelConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse panel config: {e}")))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(
                target: "chatdeck.config",
                path = %path.display(),
                "No panel config found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::Configuration(format!(
                "Failed to parse panel config at {}: {}",
                path.display(),
                e
            ))
        })
    }
}
