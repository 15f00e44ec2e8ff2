//! Data-driven battle content and loaders.
//!
//! This crate turns a data directory into the inputs of a battle:
//! - Character blueprints (`characters.ron`)
//! - The ability catalog (`abilities.ron`)
//! - Team definitions (`teams.ron`)
//! - Battle selection and rules (`battle.toml`)
//! - Script sources, resolved and cached by [`ScriptLibrary`]
//!
//! Everything loaded here is read-only once a battle starts. Loaders use
//! game-core types directly with serde for RON/TOML deserialization.

pub mod scripts;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use scripts::{ScriptLibrary, ScriptLoadError};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, BattleConfig, BattleConfigLoader, CharacterLoader, ContentFactory, LoadResult,
    LoadedContent, RulesSection, TeamLoader, TieBreakSetting,
};
