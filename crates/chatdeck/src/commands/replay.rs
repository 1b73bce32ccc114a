use async_trait::async_trait;
use chatdeck_core::{ChatEvent, ChatOutcome, ChatPanel, PanelConfig, RunId};
use eyre::{Result, WrapErr};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use super::Command;

pub struct ReplayCommand {
    pub config: PanelConfig,
    pub events: PathBuf,
    pub session_key: Option<String>,
    pub run_id: Option<String>,
    pub quiet: bool,
}

/// Outcome of one transcript line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub line: usize,
    pub outcome: ChatOutcome,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplaySummary {
    pub steps: Vec<ReplayStep>,
    pub skipped: usize,
}

/// Feed every event line from `reader` into `panel`.
///
/// Blank lines are ignored; lines that are not chat event payloads are
/// counted as skipped, the same way a transport drops a malformed push.
pub fn replay_events(panel: &mut ChatPanel, reader: impl BufRead) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.wrap_err_with(|| format!("Failed to read line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let event = serde_json::from_str::<serde_json::Value>(&line)
            .map_err(eyre::Report::from)
            .and_then(|value| ChatEvent::from_json(value).map_err(eyre::Report::from));
        match event {
            Ok(event) => {
                let outcome = panel.handle_event(Some(&event));
                summary.steps.push(ReplayStep {
                    line: line_number,
                    outcome,
                });
            }
            Err(err) => {
                tracing::warn!(target: "chatdeck.replay", line = line_number, error = %err, "Skipping malformed event");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

#[async_trait]
impl Command for ReplayCommand {
    async fn execute(&self) -> Result<()> {
        let mut config = self.config.clone();
        if let Some(session_key) = &self.session_key {
            config.session_key.clone_from(session_key);
        }

        let mut panel = ChatPanel::new(config);
        if let Some(run_id) = &self.run_id {
            panel
                .state
                .start_run(RunId::new(run_id.as_str()), chatdeck_core::types::now_millis());
        }

        let file = std::fs::File::open(&self.events)
            .wrap_err_with(|| format!("Failed to open {}", self.events.display()))?;
        let summary = replay_events(&mut panel, BufReader::new(file))?;

        tracing::info!(
            target: "chatdeck.replay",
            session = %panel.state.session_key,
            events = summary.steps.len(),
            skipped = summary.skipped,
            "Replay finished"
        );

        let mut stdout = std::io::stdout();
        if !self.quiet {
            for step in &summary.steps {
                writeln!(stdout, "{:>5}  {}", step.line, step.outcome)?;
            }
        }
        writeln!(stdout, "{}", serde_json::to_string_pretty(&panel.state)?)?;

        Ok(())
    }
}
