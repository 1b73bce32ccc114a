use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Replay chat event transcripts and inspect model catalogs for chatdeck panels.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Panel configuration file (TOML)
    #[arg(long, env = "CHATDECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Feed a JSON-lines file of chat events through a panel and print the result
    Replay {
        /// File with one chat event payload per line
        events: PathBuf,
        /// Session key of the panel (overrides the config)
        #[arg(long)]
        session_key: Option<String>,
        /// Run the panel owns before the first event
        #[arg(long)]
        run_id: Option<String>,
        /// Print only the final state
        #[arg(short, long)]
        quiet: bool,
    },
    /// List the model picker entries of the configured catalog
    Models,
}
