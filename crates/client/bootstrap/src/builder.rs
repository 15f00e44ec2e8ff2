//! Loads content and assembles the battle controller used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use game_content::ContentFactory;
use game_core::{RulesConfig, TieBreak};
use runtime::{BattleController, BattleControllerBuilder, LuaScriptHost, RuntimeConfig, ScriptBudget};

use crate::config::ClientConfig;

/// Builder that turns a [`ClientConfig`] into a ready-to-build controller.
pub struct BattleBuilder {
    config: ClientConfig,
}

impl BattleBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Loads and validates content, then pre-populates a controller builder.
    ///
    /// Fails on any content or team-selection error; nothing is left to fail
    /// mid-battle except scripts, which fall back.
    pub fn build(self) -> Result<BattleSetup> {
        let content = ContentFactory::new(&self.config.data_dir)
            .load(self.config.teams.clone())
            .with_context(|| {
                format!(
                    "failed to load battle content from {}",
                    self.config.data_dir.display()
                )
            })?;

        let runtime_config = RuntimeConfig {
            rules: self.rules(content.config.rules()),
            event_buffer_size: self
                .config
                .event_buffer_size
                .unwrap_or(RuntimeConfig::default().event_buffer_size),
        };

        let budget = self.config.script_timeout.map(|timeout| {
            let budget = ScriptBudget::new(timeout);
            match self.config.hook_interval {
                Some(interval) => budget.with_hook_interval(interval),
                None => budget,
            }
        });
        let host = LuaScriptHost::new(Arc::new(content.scripts)).with_budget(budget);

        tracing::info!(
            teams = ?content.config.teams,
            max_rounds = runtime_config.rules.max_rounds,
            tie_break = %runtime_config.rules.tie_break,
            script_budget = ?budget,
            "battle assembled"
        );

        let builder = BattleController::builder()
            .config(runtime_config)
            .roster(content.roster)
            .teams(content.config.teams.clone())
            .script_host(host);

        Ok(BattleSetup {
            runtime_config,
            teams: content.config.teams,
            builder,
        })
    }

    /// Environment overrides take precedence over `battle.toml`.
    fn rules(&self, mut rules: RulesConfig) -> RulesConfig {
        if let Some(max_rounds) = self.config.max_rounds {
            rules = rules.with_max_rounds(max_rounds);
        }
        if let Some(seed) = self.config.seed {
            rules = rules.with_tie_break(TieBreak::Seeded(seed));
        }
        rules
    }
}

pub struct BattleSetup {
    pub runtime_config: RuntimeConfig,
    /// Team ids that will fight, in team order.
    pub teams: Vec<String>,
    /// Controller builder with roster, rules and script host already set.
    pub builder: BattleControllerBuilder,
}
