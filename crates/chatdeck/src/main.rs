use chatdeck::cli::{Cli, Commands};
use chatdeck::commands::{Command, models::ModelsCommand, replay::ReplayCommand};
use chatdeck_core::PanelConfig;
use clap::Parser;
use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    chatdeck::logging::init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => PanelConfig::load(path)?,
        None => PanelConfig::default(),
    };

    match cli.command {
        Commands::Replay {
            events,
            session_key,
            run_id,
            quiet,
        } => {
            ReplayCommand {
                config,
                events,
                session_key,
                run_id,
                quiet,
            }
            .execute()
            .await
        }
        Commands::Models => ModelsCommand { config }.execute().await,
    }
}
