use async_trait::async_trait;
use chatdeck_core::{ChatPanel, PanelConfig, StaticCatalogClient};
use eyre::Result;
use std::io::Write;
use std::sync::Arc;

use super::Command;

pub struct ModelsCommand {
    pub config: PanelConfig,
}

#[async_trait]
impl Command for ModelsCommand {
    async fn execute(&self) -> Result<()> {
        let catalog = StaticCatalogClient::new(
            self.config.methods.models.clone(),
            self.config.models.clone(),
        );
        let mut panel = ChatPanel::new(self.config.clone()).with_client(Arc::new(catalog));

        panel.load_chat_models().await;
        if let Some(error) = &panel.state.chat_model_error {
            eyre::bail!("Failed to load models: {}", error);
        }

        let mut stdout = std::io::stdout();
        let options = &panel.state.chat_model_options;
        if options.is_empty() {
            writeln!(stdout, "No models configured.")?;
            return Ok(());
        }

        writeln!(stdout, "{:<48} Label", "Model")?;
        writeln!(stdout, "{}", "-".repeat(72))?;
        for option in options {
            writeln!(stdout, "{:<48} {}", option.value, option.label)?;
        }

        Ok(())
    }
}
