//! End-to-end battles driven through the native rules table.

use std::sync::Arc;

use game_core::{
    Ability, BaseStats, BattleOutcome, CharacterBlueprint, CombatantId, ControllerKind,
    DrawReason, Roster, RulesConfig, TargetScope, TeamDefinition, TeamId, TieBreak,
};
use runtime::{
    AiChoice, AiTarget, BattleController, BattleEvent, ChannelPlayerInput, DecisionSource,
    EffectRecord, NativeScriptHost, PlayerChoice, RecordingSink, RuntimeError,
};

fn rules() -> NativeScriptHost {
    NativeScriptHost::new()
        .with_ability("attack", |user, target| {
            target.take_damage(user.attack())?;
            Ok(())
        })
        .with_ability("heal", |_, target| {
            target.heal(30)?;
            Ok(())
        })
        .with_ability("wait", |_, _| Ok(()))
        .with_ability("explode", |user, target| {
            target.take_damage(1_000)?;
            user.take_damage(1_000)?;
            Ok(())
        })
        .with_ability("broken", |_, _| Err("boom".into()))
}

fn base_roster() -> Roster {
    Roster::new()
        .with_ability(Ability::new("attack", "Attack", "attack"))
        .with_ability(Ability::new("heal", "Heal", "heal").with_target(TargetScope::Allies))
        .with_ability(Ability::new("wait", "Wait", "wait").with_target(TargetScope::SelfOnly))
        .with_ability(Ability::new("explode", "Explode", "explode"))
        .with_ability(Ability::new("smash", "Smash", "broken"))
        .with_character(
            "knight",
            CharacterBlueprint::new("Knight", BaseStats::new(100, 15, 5, 10))
                .with_abilities(["attack"]),
        )
        .with_character(
            "goblin",
            CharacterBlueprint::new("Goblin", BaseStats::new(40, 8, 5, 5))
                .with_abilities(["attack"]),
        )
}

fn damage_events(events: &[BattleEvent]) -> Vec<(CombatantId, u32)> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::EffectApplied {
                effect: EffectRecord::Damaged { target, outcome },
                ..
            } => Some((*target, outcome.dealt)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn faster_knight_strikes_first_and_wins() {
    let roster = base_roster()
        .with_team("red", TeamDefinition::new("Red", ["knight"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin"]));
    let recorder = Arc::new(RecordingSink::new());

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .script_host(rules())
        .sink(recorder.clone())
        .build()
        .unwrap();

    let report = controller.run().await.unwrap();
    assert_eq!(
        report.outcome,
        BattleOutcome::victory(TeamId(0), "Red".to_string())
    );
    assert_eq!(report.survivors.len(), 1);
    assert_eq!(report.survivors[0].name, "Knight");

    let events = recorder.events();
    assert!(matches!(
        &events[1],
        BattleEvent::RoundStarted { round: 1, order } if order == &vec![CombatantId(0), CombatantId(1)]
    ));

    // 15 attack against 5 defense deals 10.
    let hits = damage_events(&events);
    assert_eq!(hits[0], (CombatantId(1), 10));
    // Goblin's 8 attack against 5 defense deals 3.
    assert_eq!(hits[1], (CombatantId(0), 3));

    assert_eq!(recorder.count("combatant_defeated"), 1);
    assert!(matches!(events.last(), Some(BattleEvent::BattleEnded { .. })));
}

#[tokio::test]
async fn battle_stops_mid_round_once_decided() {
    let roster = base_roster()
        .with_character(
            "bomber",
            CharacterBlueprint::new("Bomber", BaseStats::new(10, 1, 0, 20))
                .with_abilities(["attack"]),
        )
        .with_team("red", TeamDefinition::new("Red", ["bomber", "knight"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin"]));

    let host = rules().with_ability("attack", |_, target| {
        target.take_damage(1_000)?;
        Ok(())
    });
    let recorder = Arc::new(RecordingSink::new());

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .script_host(host)
        .sink(recorder.clone())
        .build()
        .unwrap();

    let report = controller.run().await.unwrap();
    assert_eq!(report.rounds, 1);
    assert_eq!(report.outcome.winner(), Some(TeamId(0)));
    // Only the bomber acted; the knight's turn never started.
    assert_eq!(recorder.count("turn_started"), 1);
}

#[tokio::test]
async fn mutual_elimination_is_a_draw() {
    let roster = base_roster()
        .with_character(
            "imp",
            CharacterBlueprint::new("Imp", BaseStats::new(10, 1, 0, 9)).with_abilities(["explode"]),
        )
        .with_team("red", TeamDefinition::new("Red", ["imp"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin"]));

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .script_host(rules())
        .build()
        .unwrap();

    let report = controller.run().await.unwrap();
    assert_eq!(
        report.outcome,
        BattleOutcome::Draw {
            reason: DrawReason::MutualElimination
        }
    );
    assert!(report.survivors.is_empty());
}

#[tokio::test]
async fn round_limit_ends_in_a_draw() {
    let roster = base_roster()
        .with_character(
            "monk",
            CharacterBlueprint::new("Monk", BaseStats::new(10, 1, 0, 3)).with_abilities(["wait"]),
        )
        .with_team("red", TeamDefinition::new("Red", ["monk"]))
        .with_team("blue", TeamDefinition::new("Blue", ["monk"]));
    let recorder = Arc::new(RecordingSink::new());

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .rules(RulesConfig::new().with_max_rounds(3))
        .script_host(rules())
        .sink(recorder.clone())
        .build()
        .unwrap();

    let report = controller.run().await.unwrap();
    assert_eq!(report.outcome, BattleOutcome::round_limit());
    assert_eq!(report.rounds, 3);
    assert_eq!(report.survivors.len(), 2);
    assert_eq!(recorder.count("round_ended"), 3);
}

#[tokio::test]
async fn failing_ability_script_falls_back_to_basic_attack() {
    let roster = base_roster()
        .with_character(
            "brute",
            CharacterBlueprint::new("Brute", BaseStats::new(50, 12, 0, 10)).with_abilities(["smash"]),
        )
        .with_team("red", TeamDefinition::new("Red", ["brute"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin"]));
    let recorder = Arc::new(RecordingSink::new());

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .rules(RulesConfig::new().with_max_rounds(1))
        .script_host(rules())
        .sink(recorder.clone())
        .build()
        .unwrap();

    controller.run().await.unwrap();

    let events = recorder.events();
    let failure = events
        .iter()
        .find_map(|event| match event {
            BattleEvent::ScriptFailed { script, error, .. } => Some((script.clone(), error.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!(failure.0, "broken");
    assert!(failure.1.contains("boom"));

    // max(1, 12) against 5 defense.
    assert_eq!(damage_events(&events)[0], (CombatantId(1), 7));
    assert_eq!(
        controller.state().combatant(CombatantId(1)).unwrap().current_hp(),
        33
    );
}

#[tokio::test]
async fn malformed_ai_choice_falls_back_to_builtin() {
    let roster = base_roster()
        .with_character(
            "shaman",
            CharacterBlueprint::new("Shaman", BaseStats::new(40, 6, 0, 12))
                .with_abilities(["attack"])
                .with_ai_script("confused"),
        )
        .with_team("red", TeamDefinition::new("Red", ["shaman"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin"]));

    let host = rules().with_ai("confused", |_, _, _| {
        Some(AiChoice::new("meteor", AiTarget::Index(1)))
    });
    let recorder = Arc::new(RecordingSink::new());

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .rules(RulesConfig::new().with_max_rounds(1))
        .script_host(host)
        .sink(recorder.clone())
        .build()
        .unwrap();

    assert_eq!(
        controller.state().controller_of(CombatantId(0)),
        Some(ControllerKind::Scripted)
    );
    controller.run().await.unwrap();

    let events = recorder.events();
    assert_eq!(recorder.count("decision_fallback"), 1);
    let source = events.iter().find_map(|event| match event {
        BattleEvent::ActionTaken { actor, source, .. } if *actor == CombatantId(0) => Some(*source),
        _ => None,
    });
    assert_eq!(source, Some(DecisionSource::Fallback));
}

#[tokio::test]
async fn valid_ai_choice_is_followed() {
    let roster = base_roster()
        .with_character(
            "shaman",
            CharacterBlueprint::new("Shaman", BaseStats::new(40, 6, 0, 12))
                .with_abilities(["attack"])
                .with_ai_script("focus"),
        )
        .with_team("red", TeamDefinition::new("Red", ["shaman"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin", "knight"]));

    // Always the second enemy listed, which is the knight.
    let host = rules().with_ai("focus", |_, _, _| {
        Some(AiChoice::new("attack", AiTarget::Index(2)))
    });
    let recorder = Arc::new(RecordingSink::new());

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .rules(RulesConfig::new().with_max_rounds(1))
        .script_host(host)
        .sink(recorder.clone())
        .build()
        .unwrap();

    controller.run().await.unwrap();

    let taken = recorder.events().into_iter().find_map(|event| match event {
        BattleEvent::ActionTaken {
            actor,
            target,
            source,
            ..
        } if actor == CombatantId(0) => Some((target, source)),
        _ => None,
    });
    assert_eq!(taken, Some((CombatantId(2), DecisionSource::Script)));
    assert_eq!(recorder.count("decision_fallback"), 0);
}

#[tokio::test]
async fn player_choices_come_from_the_input_channel() {
    let roster = base_roster()
        .with_character(
            "cleric",
            CharacterBlueprint::new("Cleric", BaseStats::new(100, 4, 0, 15))
                .with_abilities(["attack", "heal"]),
        )
        .with_team(
            "heroes",
            TeamDefinition::new("Heroes", ["cleric"]).with_controller(ControllerKind::Player),
        )
        .with_team("blue", TeamDefinition::new("Blue", ["goblin"]));

    let (tx, input) = ChannelPlayerInput::channel(4);
    // Heal, aimed at the only ally: the cleric itself.
    tx.send(PlayerChoice::new(1, 0)).await.unwrap();
    drop(tx);

    let recorder = Arc::new(RecordingSink::new());
    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["heroes", "blue"])
        .rules(RulesConfig::new().with_max_rounds(2))
        .script_host(rules())
        .player_input(input)
        .sink(recorder.clone())
        .build()
        .unwrap();

    controller.run().await.unwrap();

    let actions: Vec<(String, DecisionSource)> = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::ActionTaken {
                actor,
                ability,
                source,
                ..
            } if actor == CombatantId(0) => Some((ability.to_string(), source)),
            _ => None,
        })
        .collect();

    assert_eq!(
        actions,
        vec![
            ("heal".to_string(), DecisionSource::Player),
            // Channel closed: the built-in AI takes over.
            ("attack".to_string(), DecisionSource::Fallback),
        ]
    );
}

#[tokio::test]
async fn seeded_battles_are_reproducible() {
    let roster = base_roster()
        .with_character(
            "squire",
            CharacterBlueprint::new("Squire", BaseStats::new(60, 9, 2, 5)).with_abilities(["attack"]),
        )
        .with_team("red", TeamDefinition::new("Red", ["squire", "goblin"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin", "squire"]));
    let rules_config = RulesConfig::new().with_tie_break(TieBreak::Seeded(7));

    let mut runs = Vec::new();
    for _ in 0..2 {
        let recorder = Arc::new(RecordingSink::new());
        let mut controller = BattleController::builder()
            .roster(roster.clone())
            .teams(["red", "blue"])
            .rules(rules_config)
            .script_host(rules())
            .sink(recorder.clone())
            .build()
            .unwrap();
        let report = controller.run().await.unwrap();
        runs.push((report, recorder.events()));
    }

    assert_eq!(runs[0].0, runs[1].0);
    assert_eq!(runs[0].1, runs[1].1);
}

#[tokio::test]
async fn setup_errors_surface_from_build() {
    let roster = base_roster().with_team("red", TeamDefinition::new("Red", ["knight"]));

    let single = BattleController::builder()
        .roster(roster.clone())
        .teams(["red"])
        .script_host(rules())
        .build();
    assert!(matches!(single, Err(RuntimeError::Setup(_))));

    let missing_host = BattleController::builder()
        .roster(roster)
        .teams(["red", "red"])
        .build();
    assert!(matches!(missing_host, Err(RuntimeError::MissingScriptHost)));
}

#[tokio::test]
async fn bus_subscribers_see_lifecycle_events() {
    let roster = base_roster()
        .with_team("red", TeamDefinition::new("Red", ["knight"]))
        .with_team("blue", TeamDefinition::new("Blue", ["goblin"]));

    let mut controller = BattleController::builder()
        .roster(roster)
        .teams(["red", "blue"])
        .script_host(rules())
        .build()
        .unwrap();
    let mut battle = controller.subscribe(runtime::Topic::Battle);

    controller.run().await.unwrap();

    let first = battle.recv().await.unwrap();
    assert!(matches!(first, BattleEvent::BattleStarted { .. }));
}
