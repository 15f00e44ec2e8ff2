pub mod combatant;
pub mod common;
pub mod team;

// Re-export combatant types
pub use combatant::{BaseStats, CharacterBlueprint, Combatant};

// Re-export common types
pub use common::{CombatantId, Position, TeamId};

// Re-export team types
pub use team::{ControllerKind, Team};
