//! Errors raised while turning a roster into a battle.

use crate::error::{ErrorSeverity, GameError};

/// Data validation failure. Fatal to battle setup; never raised mid-battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("team `{team}` references unknown character `{character}`")]
    UnknownCharacter { team: String, character: String },

    #[error("character `{character}` references unknown ability `{ability}`")]
    UnknownAbility { character: String, ability: String },

    #[error("unknown team `{0}`")]
    UnknownTeam(String),

    #[error("team `{0}` has no members")]
    EmptyTeam(String),

    #[error("team `{0}` is selected more than once")]
    DuplicateTeam(String),

    #[error("a battle needs at least two teams, got {0}")]
    NotEnoughTeams(usize),

    #[error("character `{character}` is invalid: {reason}")]
    InvalidStats {
        character: String,
        reason: &'static str,
    },

    #[error("{owner} `{name}` has no script reference")]
    MissingScript { owner: &'static str, name: String },

    #[error("battle has more than {max} teams")]
    TooManyTeams { max: usize },

    #[error("battle has more than {max} combatants")]
    TooManyCombatants { max: usize },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCharacter { .. } => "SETUP_UNKNOWN_CHARACTER",
            Self::UnknownAbility { .. } => "SETUP_UNKNOWN_ABILITY",
            Self::UnknownTeam(_) => "SETUP_UNKNOWN_TEAM",
            Self::EmptyTeam(_) => "SETUP_EMPTY_TEAM",
            Self::DuplicateTeam(_) => "SETUP_DUPLICATE_TEAM",
            Self::NotEnoughTeams(_) => "SETUP_NOT_ENOUGH_TEAMS",
            Self::InvalidStats { .. } => "SETUP_INVALID_STATS",
            Self::MissingScript { .. } => "SETUP_MISSING_SCRIPT",
            Self::TooManyTeams { .. } => "SETUP_TOO_MANY_TEAMS",
            Self::TooManyCombatants { .. } => "SETUP_TOO_MANY_COMBATANTS",
        }
    }
}
