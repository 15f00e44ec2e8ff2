//! Content loaders for reading battle data from files.
//!
//! Each loader reads one RON/TOML file into game-core types; [`ContentFactory`]
//! ties them together for a data directory.

pub mod abilities;
pub mod characters;
pub mod config;
pub mod factory;
pub mod teams;

pub use abilities::AbilityLoader;
pub use characters::CharacterLoader;
pub use config::{BattleConfig, BattleConfigLoader, RulesSection, TieBreakSetting};
pub use factory::{ContentFactory, LoadedContent};
pub use teams::TeamLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
