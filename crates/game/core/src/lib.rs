//! Deterministic battle rules and data types shared across clients.
//!
//! `game-core` defines the canonical combat formulas, the battle state, the
//! turn scheduler and battle setup, and exposes pure APIs reused by the content
//! loader, the runtime, and tests. Nothing in this crate performs I/O or runs
//! scripts.
pub mod ability;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod roster;
pub mod state;

pub use ability::{Ability, AbilityCatalog, AbilityId, TargetScope};
pub use combat::{DamageOutcome, HealOutcome, MINIMUM_DAMAGE, basic_attack_damage};
pub use config::RulesConfig;
pub use engine::{
    BattleOutcome, DrawReason, SetupError, TieBreak, compute_turn_order, setup_battle,
};
pub use error::{ErrorSeverity, GameError};
pub use roster::{Roster, TeamDefinition};
pub use state::{
    BaseStats, BattleState, CharacterBlueprint, Combatant, CombatantId, ControllerKind, Position,
    Team, TeamId,
};
