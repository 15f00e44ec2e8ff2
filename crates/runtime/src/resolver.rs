//! Resolution of a single combatant turn.
//!
//! The resolver asks the actor's controller for a decision, checks it against
//! the battle state, and executes the chosen ability through the script host.
//! Nothing raised by a collaborator escapes: bad decisions become built-in AI
//! decisions and failed ability scripts become basic attacks.

use std::sync::Arc;

use game_core::{
    Ability, AbilityCatalog, AbilityId, BattleState, Combatant, CombatantId, ControllerKind,
    GameError, basic_attack_damage,
};

use crate::api::{AbilityOption, DecisionRequest, PlayerInput, TargetOption};
use crate::events::{BattleEvent, DecisionSource, EventSink};
use crate::providers::BuiltinAi;
use crate::script::{EffectRecord, ScriptHost};

/// What happened during one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The actor was defeated before its turn came up.
    Skipped,
    /// No living enemy was left to act against.
    NoEnemies,
    /// The actor knows no usable ability.
    NoAction,
    Acted {
        ability: AbilityId,
        target: CombatantId,
        source: DecisionSource,
        /// The ability script failed and a basic attack was applied instead.
        script_failed: bool,
    },
}

/// A checked decision, ready to execute.
struct Decision {
    ability: Arc<Ability>,
    target: CombatantId,
    source: DecisionSource,
}

/// A decision straight from a controller, before it is checked.
struct Proposal {
    ability: AbilityId,
    target: CombatantId,
    source: DecisionSource,
}

pub struct ActionResolver {
    catalog: Arc<AbilityCatalog>,
    scripts: Arc<dyn ScriptHost>,
    player: Option<Arc<dyn PlayerInput>>,
    sink: Arc<dyn EventSink>,
}

impl ActionResolver {
    pub fn new(
        catalog: Arc<AbilityCatalog>,
        scripts: Arc<dyn ScriptHost>,
        player: Option<Arc<dyn PlayerInput>>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            catalog,
            scripts,
            player,
            sink,
        }
    }

    /// Runs one full turn for `actor`.
    ///
    /// Clears the actor's defend stance first; a stance lasts until the
    /// defender's next turn.
    pub async fn resolve_turn(&self, state: &mut BattleState, actor: CombatantId) -> TurnOutcome {
        let Some(combatant) = state.combatant_mut(actor) else {
            return TurnOutcome::Skipped;
        };
        combatant.begin_turn();
        if !combatant.is_alive() {
            return TurnOutcome::Skipped;
        }
        let actor_state = combatant.clone();

        if state.enemies_of(actor).is_empty() {
            return TurnOutcome::NoEnemies;
        }

        self.sink.emit(&BattleEvent::TurnStarted {
            round: state.round(),
            actor,
            name: actor_state.name.clone(),
        });

        let Some(decision) = self.decide(state, &actor_state).await else {
            tracing::debug!(actor = %actor_state.name, "no usable ability");
            self.sink.emit(&BattleEvent::NoAction {
                actor,
                actor_name: actor_state.name.clone(),
            });
            return TurnOutcome::NoAction;
        };

        let target_name = state
            .combatant(decision.target)
            .map(|target| target.name.clone())
            .unwrap_or_default();

        tracing::debug!(
            actor = %actor_state.name,
            ability = %decision.ability.id,
            target = %target_name,
            source = ?decision.source,
            "action chosen"
        );

        self.sink.emit(&BattleEvent::ActionTaken {
            actor,
            actor_name: actor_state.name.clone(),
            ability: decision.ability.id.clone(),
            ability_name: decision.ability.name.clone(),
            target: decision.target,
            target_name,
            source: decision.source,
        });

        let script_failed = !self.execute(state, &actor_state, &decision).await;

        TurnOutcome::Acted {
            ability: decision.ability.id.clone(),
            target: decision.target,
            source: decision.source,
            script_failed,
        }
    }

    /// Returns `None` only when the actor cannot act at all.
    async fn decide(&self, state: &BattleState, actor: &Combatant) -> Option<Decision> {
        self.catalog.resolve(&actor.abilities).next()?;

        let proposal = match state.controller_of(actor.id) {
            Some(ControllerKind::Player) => self.ask_player(state, actor).await,
            Some(ControllerKind::Scripted) if actor.ai_script.is_some() => {
                self.ask_script(state, actor).await
            }
            _ => return self.builtin(state, actor.id, DecisionSource::BuiltinAi),
        };

        match proposal.and_then(|proposal| self.validate(state, actor, proposal)) {
            Ok(decision) => Some(decision),
            Err(reason) => {
                tracing::debug!(actor = %actor.name, %reason, "falling back to built-in AI");
                self.sink.emit(&BattleEvent::DecisionFallback {
                    actor: actor.id,
                    actor_name: actor.name.clone(),
                    reason,
                });
                self.builtin(state, actor.id, DecisionSource::Fallback)
            }
        }
    }

    fn builtin(
        &self,
        state: &BattleState,
        actor: CombatantId,
        source: DecisionSource,
    ) -> Option<Decision> {
        BuiltinAi::decide(state, actor, &self.catalog).map(|(ability, target)| Decision {
            ability,
            target,
            source,
        })
    }

    async fn ask_player(&self, state: &BattleState, actor: &Combatant) -> Result<Proposal, String> {
        let player = self
            .player
            .as_ref()
            .ok_or_else(|| "no player input configured".to_string())?;

        let options: Vec<AbilityOption> = self
            .catalog
            .resolve(&actor.abilities)
            .map(|ability| AbilityOption {
                ability: Arc::clone(ability),
                targets: state
                    .legal_targets(actor.id, ability.target)
                    .into_iter()
                    .filter_map(|id| state.combatant(id))
                    .map(TargetOption::from)
                    .collect(),
            })
            .collect();

        let request = DecisionRequest {
            round: state.round(),
            actor: actor.clone(),
            options,
        };

        let choice = player.choose_action(&request).await.map_err(|err| {
            tracing::warn!(actor = %actor.name, "player input failed: {}", err);
            err.to_string()
        })?;

        let option = request
            .options
            .get(choice.ability)
            .ok_or_else(|| format!("ability choice {} is out of range", choice.ability))?;
        let target = option
            .targets
            .get(choice.target)
            .ok_or_else(|| format!("target choice {} is out of range", choice.target))?;

        Ok(Proposal {
            ability: option.ability.id.clone(),
            target: target.id,
            source: DecisionSource::Player,
        })
    }

    async fn ask_script(&self, state: &BattleState, actor: &Combatant) -> Result<Proposal, String> {
        let reference = actor.ai_script.as_deref().unwrap_or_default();
        let enemies = collect(state, state.enemies_of(actor.id));
        let allies = collect(state, state.allies_of(actor.id));

        match self
            .scripts
            .run_ai_decision(reference, actor, &enemies, &allies)
            .await
        {
            Ok(Some(decision)) => Ok(Proposal {
                ability: decision.ability,
                target: decision.target,
                source: DecisionSource::Script,
            }),
            Ok(None) => Err(format!("{reference} returned no decision")),
            Err(err) => {
                tracing::warn!(
                    actor = %actor.name,
                    script = reference,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "AI script failed: {}",
                    err
                );
                Err(err.to_string())
            }
        }
    }

    fn validate(
        &self,
        state: &BattleState,
        actor: &Combatant,
        proposal: Proposal,
    ) -> Result<Decision, String> {
        if !actor.knows(proposal.ability.as_str()) {
            return Err(format!("{} does not know {}", actor.name, proposal.ability));
        }
        let ability = self
            .catalog
            .get(proposal.ability.as_str())
            .ok_or_else(|| format!("unknown ability {}", proposal.ability))?;

        if !state.is_legal_target(actor.id, proposal.target, ability.target) {
            return Err(format!(
                "target {} is not a legal {} target",
                proposal.target, ability.target
            ));
        }

        Ok(Decision {
            ability: Arc::clone(ability),
            target: proposal.target,
            source: proposal.source,
        })
    }

    /// Applies the ability. Returns false when the script failed and the basic
    /// attack was applied instead.
    async fn execute(&self, state: &mut BattleState, actor: &Combatant, decision: &Decision) -> bool {
        let Some(target) = state.combatant(decision.target).cloned() else {
            return true;
        };
        let reference = decision.ability.script.as_str();

        match self
            .scripts
            .run_ability_effect(reference, actor, &target)
            .await
        {
            Ok(effect) => {
                for updated in effect.combatants {
                    if updated.id != actor.id && updated.id != target.id {
                        continue;
                    }
                    if let Some(slot) = state.combatant_mut(updated.id) {
                        *slot = updated;
                    }
                }
                for record in effect.effects {
                    self.report_effect(state, actor.id, record);
                }
                true
            }
            Err(err) => {
                tracing::error!(
                    actor = %actor.name,
                    script = reference,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "ability script failed, applying basic attack: {}",
                    err
                );
                self.sink.emit(&BattleEvent::ScriptFailed {
                    actor: actor.id,
                    actor_name: actor.name.clone(),
                    script: reference.to_string(),
                    error: err.to_string(),
                });

                if let Some(slot) = state.combatant_mut(target.id) {
                    let outcome = slot.take_damage(basic_attack_damage(actor.stats.attack));
                    self.report_effect(
                        state,
                        actor.id,
                        EffectRecord::Damaged {
                            target: target.id,
                            outcome,
                        },
                    );
                }
                false
            }
        }
    }

    fn report_effect(&self, state: &BattleState, actor: CombatantId, record: EffectRecord) {
        let defeated = record.defeated().then(|| record.target());
        self.sink.emit(&BattleEvent::EffectApplied {
            actor,
            effect: record,
        });

        if let Some(combatant) = defeated.and_then(|id| state.combatant(id)) {
            tracing::info!(name = %combatant.name, team = %combatant.team_name, "combatant defeated");
            self.sink.emit(&BattleEvent::CombatantDefeated {
                id: combatant.id,
                name: combatant.name.clone(),
                team_name: combatant.team_name.clone(),
            });
        }
    }
}

fn collect(state: &BattleState, ids: Vec<CombatantId>) -> Vec<Combatant> {
    ids.into_iter()
        .filter_map(|id| state.combatant(id).cloned())
        .collect()
}
