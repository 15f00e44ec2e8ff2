//! Sandboxed execution of ability-effect and AI-decision scripts.
//!
//! A [`ScriptHost`] never sees the battle state. It receives copies of the
//! combatants involved, exposes them to the script as [`CombatantHandle`]s,
//! and returns their final state together with the effects that were applied.
//! The resolver writes that state back.

mod error;
mod handle;
#[cfg(feature = "lua")]
mod lua;
mod native;

pub use error::ScriptError;
pub use handle::{CombatantHandle, EffectRecord, HandleArena, ReadOnlyHandle};
#[cfg(feature = "lua")]
pub use lua::{LuaScriptHost, ScriptBudget};
pub use native::{AbilityRule, AiRule, NativeScriptHost};

use async_trait::async_trait;
use game_core::{AbilityId, Combatant, CombatantId};

/// Global function an ability script must define.
pub const ABILITY_ENTRY_POINT: &str = "use_ability";
/// Global function an AI script must define.
pub const AI_ENTRY_POINT: &str = "choose_action";

/// Final state of the combatants an ability touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityEffect {
    /// Updated user and target; a single entry when they are the same combatant.
    pub combatants: Vec<Combatant>,
    /// Mutations in the order the script made them.
    pub effects: Vec<EffectRecord>,
}

/// How an AI script designated its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiTarget {
    /// 1-based position in the enemies list.
    Index(i64),
    /// A handle the script received, resolved by identity.
    Combatant(CombatantId),
}

/// Raw answer of an AI script before it is checked against the enemies list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiChoice {
    pub ability: String,
    pub target: AiTarget,
}

impl AiChoice {
    pub fn new(ability: impl Into<String>, target: AiTarget) -> Self {
        Self {
            ability: ability.into(),
            target,
        }
    }

    /// Turns the choice into a decision against the enemies the script was shown.
    ///
    /// Ability and target legality are checked later by the resolver; this only
    /// rejects targets that cannot be located at all.
    pub fn resolve(self, reference: &str, enemies: &[Combatant]) -> Result<AiDecision, ScriptError> {
        let target = match self.target {
            AiTarget::Index(index) => usize::try_from(index)
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| enemies.get(index))
                .map(|enemy| enemy.id)
                .ok_or_else(|| {
                    ScriptError::malformed(
                        reference,
                        format!("target index {index} is outside 1..={}", enemies.len()),
                    )
                })?,
            AiTarget::Combatant(id) => id,
        };

        Ok(AiDecision {
            ability: AbilityId::new(self.ability),
            target,
        })
    }
}

/// An (ability, target) pair chosen by a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiDecision {
    pub ability: AbilityId,
    pub target: CombatantId,
}

/// Executes scripts against restricted combatant handles.
///
/// Every call is awaited before the battle moves on; implementations may run
/// the interpreter on a blocking worker.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    /// Runs `use_ability(user, target)` from the script at `reference`.
    async fn run_ability_effect(
        &self,
        reference: &str,
        user: &Combatant,
        target: &Combatant,
    ) -> Result<AbilityEffect, ScriptError>;

    /// Runs `choose_action(self, enemies, allies)` from the script at `reference`.
    ///
    /// `Ok(None)` means the script deliberately returned nothing.
    async fn run_ai_decision(
        &self,
        reference: &str,
        actor: &Combatant,
        enemies: &[Combatant],
        allies: &[Combatant],
    ) -> Result<Option<AiDecision>, ScriptError>;
}
