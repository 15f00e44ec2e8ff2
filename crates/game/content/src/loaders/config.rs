//! Battle configuration loader (`battle.toml`).

use std::path::{Path, PathBuf};

use game_core::{RulesConfig, TieBreak};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Tie-break policy as written in configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakSetting {
    #[default]
    RosterOrder,
    Seeded,
}

/// `[rules]` table of `battle.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSection {
    pub max_rounds: u32,
    pub tie_break: TieBreakSetting,
    /// Seed for `tie_break = "seeded"`; 0 when absent.
    pub seed: Option<u64>,
}

impl Default for RulesSection {
    fn default() -> Self {
        Self {
            max_rounds: RulesConfig::DEFAULT_MAX_ROUNDS,
            tie_break: TieBreakSetting::RosterOrder,
            seed: None,
        }
    }
}

/// Which teams fight and under which rules.
///
/// ```toml
/// teams = ["heroes", "raiders"]
/// scripts_dir = "scripts"
///
/// [rules]
/// max_rounds = 100
/// tie_break = "seeded"
/// seed = 42
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub teams: Vec<String>,
    /// Scripts root, relative to the data directory. Defaults to `scripts`.
    #[serde(default)]
    pub scripts_dir: Option<String>,
    #[serde(default)]
    pub rules: RulesSection,
}

impl BattleConfig {
    pub const DEFAULT_SCRIPTS_DIR: &'static str = "scripts";

    pub fn rules(&self) -> RulesConfig {
        let tie_break = match self.rules.tie_break {
            TieBreakSetting::RosterOrder => TieBreak::RosterOrder,
            TieBreakSetting::Seeded => TieBreak::Seeded(self.rules.seed.unwrap_or_default()),
        };

        RulesConfig::new()
            .with_max_rounds(self.rules.max_rounds)
            .with_tie_break(tie_break)
    }

    /// Scripts root resolved against `data_dir`.
    pub fn scripts_root(&self, data_dir: &Path) -> PathBuf {
        match &self.scripts_dir {
            Some(dir) => data_dir.join(dir),
            None => data_dir.join(Self::DEFAULT_SCRIPTS_DIR),
        }
    }
}

/// Loader for battle configuration from TOML files.
pub struct BattleConfigLoader;

impl BattleConfigLoader {
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse battle TOML: {}", e))
    }
}
