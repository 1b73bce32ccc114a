use eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a stderr subscriber. `RUST_LOG` wins over the `--verbose` default.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatdeck={default_level}")));

    tracing_subscriber::registry()
        .with(
            fmt::Layer::default()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing: {}", e))?;

    tracing::debug!(target: "chatdeck.logging", level = default_level, "Tracing initialized");
    Ok(())
}
