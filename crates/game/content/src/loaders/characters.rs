//! Character blueprint loader.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::CharacterBlueprint;

use crate::loaders::{LoadResult, read_file};

/// Loader for character blueprints from RON files.
///
/// File format: a map from character id to blueprint.
///
/// ```ron
/// {
///     "knight": (
///         name: "Knight",
///         stats: (max_hp: 100, attack: 15, defense: 5, speed: 10),
///         position: (x: 0, y: 0),
///         abilities: ["attack", "defend"],
///     ),
///     "goblin": (
///         name: "Goblin",
///         stats: (max_hp: 40, attack: 8, defense: 2, speed: 12),
///         abilities: ["attack"],
///         ai_script: Some("ai/goblin.lua"),
///     ),
/// }
/// ```
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, CharacterBlueprint>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse characters RON at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, CharacterBlueprint>> {
        Ok(ron::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blueprints() {
        let characters = CharacterLoader::parse(
            r#"{
                "knight": (
                    name: "Knight",
                    stats: (max_hp: 100, attack: 15, defense: 5, speed: 10),
                    position: (x: 1, y: 2),
                    abilities: ["attack"],
                ),
                "goblin": (
                    name: "Goblin",
                    stats: (max_hp: 40, attack: 8, defense: 2, speed: 12),
                    ai_script: Some("ai/goblin.lua"),
                ),
            }"#,
        )
        .unwrap();

        let knight = &characters["knight"];
        assert_eq!(knight.stats.max_hp, 100);
        assert_eq!(knight.position.x, 1);
        assert_eq!(knight.abilities[0].as_str(), "attack");

        let goblin = &characters["goblin"];
        assert!(goblin.abilities.is_empty());
        assert_eq!(goblin.ai_script.as_deref(), Some("ai/goblin.lua"));
    }
}
