use std::fs;
use std::path::{Path, PathBuf};

use game_content::{ContentFactory, TieBreakSetting};
use game_core::{ControllerKind, SetupError, setup_battle};

fn bundled_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn write_minimal(dir: &Path, ai_script: &str) {
    fs::write(dir.join("battle.toml"), "teams = [\"a\", \"b\"]\n").unwrap();
    fs::write(
        dir.join("abilities.ron"),
        r#"{ "attack": (name: "Attack", script: "attack.lua") }"#,
    )
    .unwrap();
    fs::write(
        dir.join("characters.ron"),
        format!(
            r#"{{
                "hero": (name: "Hero", stats: (max_hp: 10, attack: 3, defense: 0, speed: 1), abilities: ["attack"]),
                "imp": (name: "Imp", stats: (max_hp: 5, attack: 2, defense: 0, speed: 2), abilities: ["attack"], ai_script: Some("{ai_script}")),
            }}"#
        ),
    )
    .unwrap();
    fs::write(
        dir.join("teams.ron"),
        r#"{ "a": (name: "A", members: ["hero"]), "b": (name: "B", members: ["imp"]) }"#,
    )
    .unwrap();
    fs::create_dir_all(dir.join("scripts")).unwrap();
    fs::write(
        dir.join("scripts/attack.lua"),
        "function use_ability(u, t) t:take_damage(u.attack) end",
    )
    .unwrap();
}

#[test]
fn bundled_data_loads() {
    let content = ContentFactory::new(bundled_data()).load(None).unwrap();

    assert_eq!(content.config.teams, vec!["heroes", "raiders"]);
    assert_eq!(content.config.rules.tie_break, TieBreakSetting::RosterOrder);
    assert!(content.scripts.load("ai/goblin.lua").is_ok());

    let battle = setup_battle(&content.roster, &content.config.teams).unwrap();
    assert_eq!(battle.teams()[0].controller, ControllerKind::Player);
    assert_eq!(battle.teams()[1].controller, ControllerKind::Scripted);
    assert_eq!(battle.combatants().len(), 6);
}

#[test]
fn team_override_replaces_selection() {
    let content = ContentFactory::new(bundled_data())
        .load(Some(vec!["warband".into(), "champions".into()]))
        .unwrap();
    assert_eq!(content.config.teams, vec!["warband", "champions"]);
}

#[test]
fn unknown_team_fails_at_load() {
    let err = ContentFactory::new(bundled_data())
        .load(Some(vec!["heroes".into(), "dragons".into()]))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SetupError>(),
        Some(&SetupError::UnknownTeam("dragons".into()))
    );
}

#[test]
fn missing_ai_script_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    write_minimal(dir.path(), "ai/imp.lua");

    let err = ContentFactory::new(dir.path()).load(None).unwrap_err();
    assert!(format!("{err:#}").contains("ai/imp.lua"));
}

#[test]
fn minimal_data_dir_loads() {
    let dir = tempfile::tempdir().unwrap();
    write_minimal(dir.path(), "ai/imp.lua");
    fs::create_dir_all(dir.path().join("scripts/ai")).unwrap();
    fs::write(
        dir.path().join("scripts/ai/imp.lua"),
        "function choose_action(s, e, a) return { ability = \"attack\", target = 1 } end",
    )
    .unwrap();

    let content = ContentFactory::new(dir.path()).load(None).unwrap();
    assert_eq!(content.roster.characters.len(), 2);
    assert_eq!(content.config.rules().max_rounds, 100);
}
