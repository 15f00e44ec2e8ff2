//! Team definition loader.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::TeamDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for team definitions from RON files.
///
/// ```ron
/// {
///     "heroes": (name: "Heroes", controller: Some(Player), members: ["knight", "cleric"]),
///     "raiders": (name: "Raiders", members: ["goblin", "goblin"]),
///     "legacy": (name: "Legacy", is_player_controlled: true, members: ["knight"]),
/// }
/// ```
pub struct TeamLoader;

impl TeamLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, TeamDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse teams RON at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, TeamDefinition>> {
        Ok(ron::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::ControllerKind;

    #[test]
    fn parses_controllers() {
        let teams = TeamLoader::parse(
            r#"{
                "heroes": (name: "Heroes", controller: Some(Player), members: ["knight"]),
                "legacy": (name: "Legacy", is_player_controlled: true, members: ["knight"]),
                "raiders": (name: "Raiders", members: ["goblin", "goblin"]),
            }"#,
        )
        .unwrap();

        assert_eq!(teams["heroes"].controller, Some(ControllerKind::Player));
        assert!(teams["legacy"].is_player_controlled);
        assert_eq!(teams["raiders"].controller, None);
        assert_eq!(teams["raiders"].members.len(), 2);
    }
}
