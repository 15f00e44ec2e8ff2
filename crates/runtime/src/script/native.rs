//! Script host backed by a table of Rust closures.
//!
//! Rules see the same [`CombatantHandle`] API as Lua scripts, so a native rule
//! and a Lua script with the same reference are interchangeable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use game_core::Combatant;

use super::{
    AbilityEffect, AiChoice, AiDecision, CombatantHandle, HandleArena, ScriptError, ScriptHost,
    ABILITY_ENTRY_POINT, AI_ENTRY_POINT,
};

pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// Native counterpart of `use_ability(user, target)`.
pub type AbilityRule =
    Arc<dyn Fn(&CombatantHandle, &CombatantHandle) -> Result<(), RuleError> + Send + Sync>;

/// Native counterpart of `choose_action(self, enemies, allies)`.
pub type AiRule = Arc<
    dyn Fn(&CombatantHandle, &[CombatantHandle], &[CombatantHandle]) -> Option<AiChoice>
        + Send
        + Sync,
>;

/// Rules table keyed by script reference.
#[derive(Clone, Default)]
pub struct NativeScriptHost {
    abilities: HashMap<String, AbilityRule>,
    ai: HashMap<String, AiRule>,
}

impl NativeScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ability<F>(mut self, reference: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&CombatantHandle, &CombatantHandle) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.abilities.insert(reference.into(), Arc::new(rule));
        self
    }

    #[must_use]
    pub fn with_ai<F>(mut self, reference: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&CombatantHandle, &[CombatantHandle], &[CombatantHandle]) -> Option<AiChoice>
            + Send
            + Sync
            + 'static,
    {
        self.ai.insert(reference.into(), Arc::new(rule));
        self
    }

    fn ability_effect(
        &self,
        reference: &str,
        user: &Combatant,
        target: &Combatant,
    ) -> Result<AbilityEffect, ScriptError> {
        let rule = self
            .abilities
            .get(reference)
            .ok_or_else(|| ScriptError::MissingEntryPoint {
                reference: reference.to_string(),
                entry_point: ABILITY_ENTRY_POINT,
            })?;

        let mut arena = HandleArena::writable();
        let user = arena.handle(user);
        let target = arena.handle(target);
        rule(&user, &target).map_err(|err| ScriptError::runtime(reference, err.to_string()))?;

        let (combatants, effects) = arena.finish();
        Ok(AbilityEffect {
            combatants,
            effects,
        })
    }

    fn ai_decision(
        &self,
        reference: &str,
        actor: &Combatant,
        enemies: &[Combatant],
        allies: &[Combatant],
    ) -> Result<Option<AiDecision>, ScriptError> {
        let rule = self
            .ai
            .get(reference)
            .ok_or_else(|| ScriptError::MissingEntryPoint {
                reference: reference.to_string(),
                entry_point: AI_ENTRY_POINT,
            })?;

        let mut arena = HandleArena::read_only();
        let me = arena.handle(actor);
        let enemy_handles = arena.handles(enemies);
        let ally_handles = arena.handles(allies);

        rule(&me, enemy_handles.as_slice(), ally_handles.as_slice())
            .map(|choice| choice.resolve(reference, enemies))
            .transpose()
    }
}

#[async_trait]
impl ScriptHost for NativeScriptHost {
    async fn run_ability_effect(
        &self,
        reference: &str,
        user: &Combatant,
        target: &Combatant,
    ) -> Result<AbilityEffect, ScriptError> {
        self.ability_effect(reference, user, target)
    }

    async fn run_ai_decision(
        &self,
        reference: &str,
        actor: &Combatant,
        enemies: &[Combatant],
        allies: &[Combatant],
    ) -> Result<Option<AiDecision>, ScriptError> {
        self.ai_decision(reference, actor, enemies, allies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{AiTarget, EffectRecord};
    use game_core::{BaseStats, CharacterBlueprint, CombatantId, TeamId};

    fn combatant(id: u16, team: u8, hp: u32) -> Combatant {
        let blueprint = CharacterBlueprint::new(format!("c{id}"), BaseStats::new(hp, 15, 5, 5));
        Combatant::from_blueprint(CombatantId(id), TeamId(team), "team", &blueprint)
    }

    fn host() -> NativeScriptHost {
        NativeScriptHost::new()
            .with_ability("strike", |user, target| {
                target.take_damage(user.attack())?;
                Ok(())
            })
            .with_ability("broken", |_, _| Err("boom".into()))
            .with_ai("weakest", |_, enemies, _| {
                let weakest = enemies.iter().min_by_key(|e| e.current_hp())?;
                Some(AiChoice::new("strike", AiTarget::Combatant(weakest.id())))
            })
            .with_ai("greedy", |me, _, _| {
                me.heal(10).ok()?;
                None
            })
    }

    #[tokio::test]
    async fn ability_rule_mutates_target() {
        let user = combatant(0, 0, 100);
        let target = combatant(1, 1, 100);

        let effect = host()
            .run_ability_effect("strike", &user, &target)
            .await
            .unwrap();

        assert_eq!(effect.combatants[1].current_hp(), 90);
        assert!(matches!(
            effect.effects[0],
            EffectRecord::Damaged { target: CombatantId(1), .. }
        ));
    }

    #[tokio::test]
    async fn failing_rule_is_a_runtime_error() {
        let user = combatant(0, 0, 100);
        let err = host()
            .run_ability_effect("broken", &user, &user)
            .await
            .unwrap_err();
        assert_eq!(err, ScriptError::runtime("broken", "boom"));
    }

    #[tokio::test]
    async fn unknown_reference_is_missing_entry_point() {
        let user = combatant(0, 0, 100);
        let err = host()
            .run_ability_effect("nope", &user, &user)
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::MissingEntryPoint { .. }));
    }

    #[tokio::test]
    async fn ai_rule_picks_by_identity() {
        let me = combatant(0, 0, 100);
        let enemies = vec![combatant(1, 1, 50), combatant(2, 1, 20)];

        let decision = host()
            .run_ai_decision("weakest", &me, &enemies, std::slice::from_ref(&me))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(decision.target, CombatantId(2));
        assert_eq!(decision.ability.as_str(), "strike");
    }

    #[tokio::test]
    async fn ai_handles_are_read_only() {
        let me = combatant(0, 0, 100);
        let decision = host()
            .run_ai_decision("greedy", &me, &[combatant(1, 1, 10)], &[])
            .await
            .unwrap();
        assert_eq!(decision, None);
    }
}
