//! The terminal frontend: console presenter, stdin input and event log.
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use client_bootstrap::Frontend;
use runtime::{BattleControllerBuilder, BattleReport, JsonLinesSink};

use crate::config::CliConfig;
use crate::input::LinePlayerInput;
use crate::presenter::ConsolePresenter;

pub struct CliFrontend {
    config: CliConfig,
    event_log: Option<PathBuf>,
}

impl CliFrontend {
    pub fn new(config: CliConfig) -> Self {
        Self {
            config,
            event_log: None,
        }
    }

    /// Mirror every battle event to a JSON-lines file at `path`.
    pub fn with_event_log(mut self, path: Option<PathBuf>) -> Self {
        self.event_log = path;
        self
    }
}

#[async_trait]
impl Frontend for CliFrontend {
    fn attach(&mut self, builder: BattleControllerBuilder) -> Result<BattleControllerBuilder> {
        let mut builder = builder
            .sink(ConsolePresenter::stdout(&self.config.ui))
            .player_input(LinePlayerInput::stdin());

        if let Some(path) = &self.event_log {
            let file = File::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))?;
            builder = builder.sink(JsonLinesSink::new(BufWriter::new(file)));
            tracing::info!("Event log: {}", path.display());
        }

        Ok(builder)
    }

    async fn finish(&mut self, report: &BattleReport) -> Result<()> {
        tracing::info!(
            outcome = ?report.outcome,
            rounds = report.rounds,
            survivors = report.survivors.len(),
            fingerprint = %report.fingerprint,
            "battle report"
        );
        if self.config.ui.show_fingerprints {
            println!("Final state {}", report.fingerprint);
        }
        Ok(())
    }
}
