//! Single-turn resolution against hand-built battle states.

use std::sync::Arc;

use game_core::{
    Ability, BaseStats, BattleState, CharacterBlueprint, CombatantId, Roster, TargetScope,
    TeamDefinition, setup_battle,
};
use runtime::{
    ActionResolver, BattleEvent, DecisionSource, EffectRecord, NativeScriptHost, RecordingSink,
    TurnOutcome,
};

fn host() -> NativeScriptHost {
    NativeScriptHost::new()
        .with_ability("attack", |user, target| {
            target.take_damage(user.attack())?;
            Ok(())
        })
        .with_ability("heal", |_, target| {
            target.heal(30)?;
            Ok(())
        })
}

fn roster() -> Roster {
    Roster::new()
        .with_ability(Ability::new("attack", "Attack", "attack"))
        .with_ability(Ability::new("heal", "Heal", "heal").with_target(TargetScope::Allies))
        .with_character(
            "raider",
            CharacterBlueprint::new("Raider", BaseStats::new(50, 8, 0, 5))
                .with_abilities(["attack"]),
        )
        .with_character(
            "guard",
            CharacterBlueprint::new("Guard", BaseStats::new(100, 5, 5, 4))
                .with_abilities(["attack"]),
        )
        .with_character(
            "priest",
            CharacterBlueprint::new("Priest", BaseStats::new(120, 2, 0, 3)).with_abilities(["heal"]),
        )
        .with_character(
            "statue",
            CharacterBlueprint::new("Statue", BaseStats::new(10, 0, 0, 1)),
        )
        .with_team("raiders", TeamDefinition::new("Raiders", ["raider"]))
        .with_team("guards", TeamDefinition::new("Guards", ["guard", "priest", "statue"]))
}

fn setup(roster: &Roster) -> (BattleState, ActionResolver, Arc<RecordingSink>) {
    let state = setup_battle(roster, &["raiders", "guards"]).unwrap();
    let recorder = Arc::new(RecordingSink::new());
    let resolver = ActionResolver::new(
        Arc::new(roster.abilities.clone()),
        Arc::new(host()),
        None,
        recorder.clone(),
    );
    (state, resolver, recorder)
}

const RAIDER: CombatantId = CombatantId(0);
const GUARD: CombatantId = CombatantId(1);
const PRIEST: CombatantId = CombatantId(2);
const STATUE: CombatantId = CombatantId(3);

#[tokio::test]
async fn defending_target_takes_minimum_damage() {
    let roster = roster();
    let (mut state, resolver, recorder) = setup(&roster);
    // Leave the guard as the only legal target with lower HP.
    state.combatant_mut(PRIEST).unwrap().take_damage(1_000);
    state.combatant_mut(STATUE).unwrap().take_damage(1_000);
    state.combatant_mut(GUARD).unwrap().defend();

    let outcome = resolver.resolve_turn(&mut state, RAIDER).await;
    assert_eq!(
        outcome,
        TurnOutcome::Acted {
            ability: "attack".into(),
            target: GUARD,
            source: DecisionSource::BuiltinAi,
            script_failed: false,
        }
    );

    // 8 base against doubled defense 10.
    assert_eq!(state.combatant(GUARD).unwrap().current_hp(), 99);
    assert!(recorder.events().iter().any(|event| matches!(
        event,
        BattleEvent::EffectApplied {
            effect: EffectRecord::Damaged { outcome, .. },
            ..
        } if outcome.dealt == 1 && outcome.effective_defense == 10
    )));
}

#[tokio::test]
async fn builtin_heal_picks_the_most_wounded_ally() {
    let roster = roster();
    let (mut state, resolver, _) = setup(&roster);
    state.combatant_mut(GUARD).unwrap().take_damage(25);
    assert_eq!(state.combatant(GUARD).unwrap().current_hp(), 80);
    state.combatant_mut(STATUE).unwrap().take_damage(1_000);

    let outcome = resolver.resolve_turn(&mut state, PRIEST).await;
    assert!(matches!(outcome, TurnOutcome::Acted { target, .. } if target == GUARD));
    assert_eq!(state.combatant(GUARD).unwrap().current_hp(), 100);
}

#[tokio::test]
async fn defend_stance_clears_at_own_turn() {
    let roster = roster();
    let (mut state, resolver, _) = setup(&roster);
    state.combatant_mut(GUARD).unwrap().defend();

    resolver.resolve_turn(&mut state, GUARD).await;
    assert!(!state.combatant(GUARD).unwrap().is_defending());
}

#[tokio::test]
async fn defeated_actor_is_skipped() {
    let roster = roster();
    let (mut state, resolver, recorder) = setup(&roster);
    state.combatant_mut(RAIDER).unwrap().take_damage(1_000);

    assert_eq!(
        resolver.resolve_turn(&mut state, RAIDER).await,
        TurnOutcome::Skipped
    );
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn no_enemies_is_a_no_op() {
    let roster = roster();
    let (mut state, resolver, recorder) = setup(&roster);
    state.combatant_mut(RAIDER).unwrap().take_damage(1_000);

    assert_eq!(
        resolver.resolve_turn(&mut state, GUARD).await,
        TurnOutcome::NoEnemies
    );
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn combatant_without_abilities_reports_no_action() {
    let roster = roster();
    let (mut state, resolver, recorder) = setup(&roster);

    assert_eq!(
        resolver.resolve_turn(&mut state, STATUE).await,
        TurnOutcome::NoAction
    );
    assert_eq!(recorder.count("turn_started"), 1);
    assert_eq!(recorder.count("no_action"), 1);
}

#[tokio::test]
async fn player_without_input_falls_back() {
    let roster = roster().with_team(
        "raiders",
        TeamDefinition::new("Raiders", ["raider"])
            .with_controller(game_core::ControllerKind::Player),
    );
    let (mut state, resolver, recorder) = setup(&roster);

    let outcome = resolver.resolve_turn(&mut state, RAIDER).await;
    assert!(matches!(
        outcome,
        TurnOutcome::Acted {
            source: DecisionSource::Fallback,
            ..
        }
    ));
    assert_eq!(recorder.count("decision_fallback"), 1);
}
