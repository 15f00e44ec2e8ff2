//! Ability catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{Ability, AbilityCatalog, AbilityId};

use crate::loaders::{LoadResult, read_file};

/// Loader for the ability catalog from RON files.
///
/// File format: a map from ability id to definition. The id is taken from the
/// map key.
///
/// ```ron
/// {
///     "attack": (name: "Attack", script: "abilities/attack.lua"),
///     "heal": (
///         name: "Heal",
///         description: "Restores 30 HP to an ally.",
///         script: "abilities/heal.lua",
///         target: Allies,
///     ),
/// }
/// ```
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse abilities RON at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<AbilityCatalog> {
        let raw: BTreeMap<String, Ability> = ron::from_str(content)?;

        Ok(raw
            .into_iter()
            .map(|(id, mut ability)| {
                ability.id = AbilityId::new(id);
                ability
            })
            .collect())
    }
}
