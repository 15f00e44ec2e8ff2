//! Built-in heuristic used by `BuiltinAi` teams and as the universal fallback.

use std::sync::Arc;

use game_core::{Ability, AbilityCatalog, BattleState, Combatant, CombatantId};

/// Picks "attack" if known, otherwise the first known ability, and aims it at
/// the legal target with the lowest current HP (first listed on ties).
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinAi;

impl BuiltinAi {
    /// The ability the heuristic uses for `actor`, if it knows any.
    pub fn choose_ability(actor: &Combatant, catalog: &AbilityCatalog) -> Option<Arc<Ability>> {
        let mut known = catalog.resolve(&actor.abilities);
        let first = known.next()?;
        if first.is_basic_attack() {
            return Some(Arc::clone(first));
        }

        let attack = known.find(|ability| ability.is_basic_attack());
        Some(Arc::clone(attack.unwrap_or(first)))
    }

    /// Full decision for `actor`, or `None` if it knows no abilities or the
    /// chosen ability has no legal target.
    pub fn decide(
        state: &BattleState,
        actor: CombatantId,
        catalog: &AbilityCatalog,
    ) -> Option<(Arc<Ability>, CombatantId)> {
        let ability = Self::choose_ability(state.combatant(actor)?, catalog)?;

        let target = state
            .legal_targets(actor, ability.target)
            .into_iter()
            .filter_map(|id| state.combatant(id))
            .min_by_key(|candidate| candidate.current_hp())?
            .id;

        Some((ability, target))
    }
}
