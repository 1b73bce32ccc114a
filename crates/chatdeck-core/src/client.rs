use crate::error::{Error, Result};
use crate::state::ModelOption;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Request/response capability of the gateway connection.
///
/// Implementations wrap whatever transport the front-end uses; the panel
/// only needs to issue a method call and await its JSON result.
#[async_trait]
pub trait RequestClient: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}

/// One entry of a model catalog as served by `models.list`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default, alias = "id")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        default,
        alias = "name",
        alias = "display_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
}

impl CatalogEntry {
    /// Picker entry for this catalog row, or `None` if it cannot be addressed.
    pub fn to_option(&self) -> Option<ModelOption> {
        let provider = non_blank(self.provider.as_deref())?;
        let model = non_blank(self.model.as_deref())?;
        let label = non_blank(self.label.as_deref())
            .or_else(|| non_blank(self.display_name.as_deref()))
            .unwrap_or(model);

        Some(ModelOption {
            value: format!("{provider}/{model}"),
            label: label.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Answers catalog requests from a fixed list, for offline panels and tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogClient {
    catalog_method: String,
    entries: Vec<CatalogEntry>,
}

impl StaticCatalogClient {
    pub fn new(catalog_method: impl Into<String>, entries: Vec<CatalogEntry>) -> Self {
        Self {
            catalog_method: catalog_method.into(),
            entries,
        }
    }
}

#[async_trait]
impl RequestClient for StaticCatalogClient {
    async fn request(&self, method: &str, _params: Value) -> Result<Value> {
        if method == self.catalog_method {
            return Ok(json!({ "models": self.entries }));
        }
        Err(Error::request(method, "not supported by a static catalog"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(provider: &str, model: &str) -> CatalogEntry {
        CatalogEntry {
            provider: Some(provider.to_string()),
            model: Some(model.to_string()),
            ..CatalogEntry::default()
        }
    }

    #[rstest]
    #[case::explicit_label(Some("GPT-5.2"), Some("ignored"), "GPT-5.2")]
    #[case::display_name(None, Some("Gemini 2.5 Pro"), "Gemini 2.5 Pro")]
    #[case::blank_label_falls_through(Some("  "), Some("Gemini"), "Gemini")]
    #[case::derived_from_model(None, None, "gpt-5.2")]
    fn label_preference(
        #[case] label: Option<&str>,
        #[case] display_name: Option<&str>,
        #[case] expected: &str,
    ) {
        let entry = CatalogEntry {
            label: label.map(str::to_string),
            display_name: display_name.map(str::to_string),
            ..entry("github-copilot", "gpt-5.2")
        };

        let option = entry.to_option().expect("addressable entry");
        assert_eq!(option.value, "github-copilot/gpt-5.2");
        assert_eq!(option.label, expected);
    }

    #[test]
    fn entries_without_provider_or_model_are_skipped() {
        let missing_model = CatalogEntry {
            provider: Some("openai".to_string()),
            ..CatalogEntry::default()
        };
        assert_eq!(missing_model.to_option(), None);
        assert_eq!(entry("", "gpt-5").to_option(), None);
    }

    #[test]
    fn accepts_id_and_name_aliases() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "provider": "anthropic",
            "id": "claude-opus-4",
            "name": "Claude Opus 4"
        }))
        .expect("decode");

        assert_eq!(
            entry.to_option(),
            Some(ModelOption {
                value: "anthropic/claude-opus-4".to_string(),
                label: "Claude Opus 4".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn static_catalog_serves_only_the_catalog_method() {
        let client = StaticCatalogClient::new("models.list", vec![entry("openai", "gpt-5")]);

        let response = client
            .request("models.list", json!({}))
            .await
            .expect("catalog");
        assert_eq!(response["models"][0]["model"], json!("gpt-5"));

        let err = client
            .request("chat.send", json!({}))
            .await
            .expect_err("unsupported");
        assert!(matches!(err, Error::Request { .. }));
    }
}
