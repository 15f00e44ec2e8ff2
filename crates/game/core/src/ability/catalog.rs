use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Ability, AbilityId};

/// Immutable lookup from ability identifier to ability definition.
///
/// Built once by the data loader and shared (via `Arc`) by every combatant and
/// every battle that uses it. Iteration order is the identifier order so that
/// anything derived from the catalog stays deterministic.
#[derive(Clone, Debug, Default)]
pub struct AbilityCatalog {
    abilities: BTreeMap<AbilityId, Arc<Ability>>,
}

impl AbilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an ability, replacing any previous definition with the same id.
    pub fn insert(&mut self, ability: Ability) -> Option<Arc<Ability>> {
        self.abilities.insert(ability.id.clone(), Arc::new(ability))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Ability>> {
        self.abilities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.abilities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Ability>> {
        self.abilities.values()
    }

    /// Resolves a list of ability ids, silently skipping unknown ones.
    ///
    /// Unknown ids are rejected at load time, so skipping here only matters for
    /// hand-built rosters in tests.
    pub fn resolve<'a>(
        &'a self,
        ids: &'a [AbilityId],
    ) -> impl Iterator<Item = &'a Arc<Ability>> + 'a {
        ids.iter().filter_map(|id| self.abilities.get(id.as_str()))
    }
}

impl FromIterator<Ability> for AbilityCatalog {
    fn from_iter<T: IntoIterator<Item = Ability>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for ability in iter {
            catalog.insert(ability);
        }
        catalog
    }
}
