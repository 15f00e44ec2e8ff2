//! Static battle data: character blueprints, the ability catalog, and team
//! definitions, keyed by the identifiers used in data files.

use std::collections::BTreeMap;

use crate::ability::AbilityCatalog;
use crate::engine::SetupError;
use crate::state::{CharacterBlueprint, ControllerKind};

/// A team as written in data files, before it is instantiated for a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamDefinition {
    pub name: String,
    /// Explicit controller. When absent it is derived by [`Self::resolve_controller`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub controller: Option<ControllerKind>,
    /// Legacy flag: `true` selects the player controller when `controller` is absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_player_controlled: bool,
    /// Character ids, in acting-order tie-break order.
    pub members: Vec<String>,
}

impl TeamDefinition {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            controller: None,
            is_player_controlled: false,
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_controller(mut self, controller: ControllerKind) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Picks the controller once, at load time.
    ///
    /// Explicit `controller` wins; then the legacy player flag; then `Scripted`
    /// if any member carries an AI script; otherwise the built-in AI.
    pub fn resolve_controller(
        &self,
        characters: &BTreeMap<String, CharacterBlueprint>,
    ) -> ControllerKind {
        if let Some(controller) = self.controller {
            return controller;
        }
        if self.is_player_controlled {
            return ControllerKind::Player;
        }

        let scripted = self
            .members
            .iter()
            .filter_map(|member| characters.get(member))
            .any(|blueprint| blueprint.ai_script.is_some());

        if scripted {
            ControllerKind::Scripted
        } else {
            ControllerKind::BuiltinAi
        }
    }
}

/// Everything a battle can be assembled from.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub characters: BTreeMap<String, CharacterBlueprint>,
    pub abilities: AbilityCatalog,
    pub teams: BTreeMap<String, TeamDefinition>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_character(mut self, id: impl Into<String>, blueprint: CharacterBlueprint) -> Self {
        self.characters.insert(id.into(), blueprint);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: crate::ability::Ability) -> Self {
        self.abilities.insert(ability);
        self
    }

    #[must_use]
    pub fn with_team(mut self, id: impl Into<String>, team: TeamDefinition) -> Self {
        self.teams.insert(id.into(), team);
        self
    }

    /// Checks every cross reference in the roster.
    ///
    /// Returns the first problem found, in identifier order.
    pub fn validate(&self) -> Result<(), SetupError> {
        for ability in self.abilities.iter() {
            if ability.script.trim().is_empty() {
                return Err(SetupError::MissingScript {
                    owner: "ability",
                    name: ability.id.to_string(),
                });
            }
        }

        for (id, blueprint) in &self.characters {
            self.validate_character(id, blueprint)?;
        }

        for (id, team) in &self.teams {
            self.validate_team(id, team)?;
        }

        Ok(())
    }

    pub(crate) fn validate_character(
        &self,
        id: &str,
        blueprint: &CharacterBlueprint,
    ) -> Result<(), SetupError> {
        if blueprint.stats.max_hp == 0 {
            return Err(SetupError::InvalidStats {
                character: id.to_string(),
                reason: "max_hp must be at least 1",
            });
        }

        if let Some(unknown) = blueprint
            .abilities
            .iter()
            .find(|ability| !self.abilities.contains(ability.as_str()))
        {
            return Err(SetupError::UnknownAbility {
                character: id.to_string(),
                ability: unknown.to_string(),
            });
        }

        if matches!(&blueprint.ai_script, Some(script) if script.trim().is_empty()) {
            return Err(SetupError::MissingScript {
                owner: "character",
                name: id.to_string(),
            });
        }

        Ok(())
    }

    pub(crate) fn validate_team(&self, id: &str, team: &TeamDefinition) -> Result<(), SetupError> {
        if team.members.is_empty() {
            return Err(SetupError::EmptyTeam(id.to_string()));
        }

        if let Some(unknown) = team
            .members
            .iter()
            .find(|member| !self.characters.contains_key(member.as_str()))
        {
            return Err(SetupError::UnknownCharacter {
                team: id.to_string(),
                character: unknown.clone(),
            });
        }

        Ok(())
    }
}
