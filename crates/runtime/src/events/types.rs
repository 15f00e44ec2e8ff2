//! Battle events delivered to presentation and logging collaborators.

use game_core::{
    AbilityId, BattleOutcome, Combatant, CombatantId, Position, Team, TeamId,
};
use serde::{Deserialize, Serialize};

use crate::script::EffectRecord;

/// Who produced the decision a turn acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionSource {
    Player,
    Script,
    BuiltinAi,
    /// The built-in AI replaced a missing or invalid decision.
    Fallback,
}

/// Display snapshot of one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantStatus {
    pub id: CombatantId,
    pub name: String,
    pub team: TeamId,
    pub team_name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub is_alive: bool,
    pub is_defending: bool,
    pub position: Position,
}

impl From<&Combatant> for CombatantStatus {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            name: combatant.name.clone(),
            team: combatant.team,
            team_name: combatant.team_name.clone(),
            current_hp: combatant.current_hp(),
            max_hp: combatant.max_hp(),
            is_alive: combatant.is_alive(),
            is_defending: combatant.is_defending(),
            position: combatant.position,
        }
    }
}

/// Display snapshot of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub controller: String,
    pub members: Vec<CombatantId>,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            controller: team.controller.to_string(),
            members: team.members.clone(),
        }
    }
}

/// Everything observable about a battle, as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    BattleStarted {
        teams: Vec<TeamSummary>,
        combatants: Vec<CombatantStatus>,
    },

    RoundStarted {
        round: u32,
        order: Vec<CombatantId>,
    },

    TurnStarted {
        round: u32,
        actor: CombatantId,
        name: String,
    },

    /// A decision is about to be executed.
    ActionTaken {
        actor: CombatantId,
        actor_name: String,
        ability: AbilityId,
        ability_name: String,
        target: CombatantId,
        target_name: String,
        source: DecisionSource,
    },

    EffectApplied {
        actor: CombatantId,
        effect: EffectRecord,
    },

    /// The decision source produced nothing usable; the built-in AI decided.
    DecisionFallback {
        actor: CombatantId,
        actor_name: String,
        reason: String,
    },

    /// An ability script failed; a basic attack was applied instead.
    ScriptFailed {
        actor: CombatantId,
        actor_name: String,
        script: String,
        error: String,
    },

    /// The actor knows no usable ability.
    NoAction {
        actor: CombatantId,
        actor_name: String,
    },

    CombatantDefeated {
        id: CombatantId,
        name: String,
        team_name: String,
    },

    RoundEnded {
        round: u32,
        status: Vec<CombatantStatus>,
        /// Hex SHA-256 of the battle state after the round.
        fingerprint: String,
    },

    BattleEnded {
        outcome: BattleOutcome,
        rounds: u32,
        survivors: Vec<CombatantStatus>,
        fingerprint: String,
    },
}

impl BattleEvent {
    /// Short variant name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BattleStarted { .. } => "battle_started",
            Self::RoundStarted { .. } => "round_started",
            Self::TurnStarted { .. } => "turn_started",
            Self::ActionTaken { .. } => "action_taken",
            Self::EffectApplied { .. } => "effect_applied",
            Self::DecisionFallback { .. } => "decision_fallback",
            Self::ScriptFailed { .. } => "script_failed",
            Self::NoAction { .. } => "no_action",
            Self::CombatantDefeated { .. } => "combatant_defeated",
            Self::RoundEnded { .. } => "round_ended",
            Self::BattleEnded { .. } => "battle_ended",
        }
    }
}
