//! Content factory for building a roster from a data directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use game_core::{AbilityCatalog, Roster};

use crate::loaders::{
    AbilityLoader, BattleConfig, BattleConfigLoader, CharacterLoader, LoadResult, TeamLoader,
};
use crate::scripts::ScriptLibrary;

/// Everything needed to start a battle, validated.
#[derive(Debug)]
pub struct LoadedContent {
    pub roster: Roster,
    pub config: BattleConfig,
    pub scripts: ScriptLibrary,
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── characters.ron
/// ├── abilities.ron
/// ├── teams.ron
/// └── scripts/
///     ├── abilities/
///     │   └── attack.lua
///     └── ai/
///         └── goblin.lua
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle selection and rules from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        BattleConfigLoader::load(&self.data_dir.join("battle.toml"))
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load characters, abilities and teams, then validate cross references.
    pub fn load_roster(&self) -> LoadResult<Roster> {
        let roster = Roster {
            characters: CharacterLoader::load(&self.data_dir.join("characters.ron"))?,
            abilities: self.load_abilities()?,
            teams: TeamLoader::load(&self.data_dir.join("teams.ron"))?,
        };

        roster
            .validate()
            .with_context(|| format!("invalid roster in {}", self.data_dir.display()))?;

        Ok(roster)
    }

    /// Loads everything and checks the selected teams can actually fight.
    ///
    /// `teams_override` replaces the team selection of `battle.toml`. Every
    /// script referenced by a selected combatant is read now, so a missing
    /// file fails here instead of mid-battle.
    pub fn load(&self, teams_override: Option<Vec<String>>) -> LoadResult<LoadedContent> {
        let roster = self.load_roster()?;
        let mut config = self.load_config()?;
        if let Some(teams) = teams_override {
            config.teams = teams;
        }

        // Surfaces selection errors (unknown team, fewer than two) at load time.
        let battle = game_core::setup_battle(&roster, &config.teams)?;

        let scripts = ScriptLibrary::new(config.scripts_root(&self.data_dir));
        let references = battle.combatants().iter().flat_map(|combatant| {
            let abilities = roster
                .abilities
                .resolve(&combatant.abilities)
                .map(|ability| ability.script.as_str());
            abilities.chain(combatant.ai_script.as_deref())
        });
        let count = scripts
            .preload(references)
            .context("failed to load battle scripts")?;

        tracing::info!(
            data_dir = %self.data_dir.display(),
            teams = ?config.teams,
            characters = roster.characters.len(),
            abilities = roster.abilities.len(),
            scripts = count,
            "content loaded"
        );

        Ok(LoadedContent {
            roster,
            config,
            scripts,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
