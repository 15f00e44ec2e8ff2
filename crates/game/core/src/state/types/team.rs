use strum::{AsRefStr, Display, EnumString};

use super::{CombatantId, TeamId};

/// Who decides the actions of a team's members.
///
/// Resolved once per team when the roster is loaded; the resolver never
/// re-derives it from optional fields during a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ControllerKind {
    /// A human picks ability and target through the input collaborator.
    Player,
    /// Each member's AI script decides; members without one use the built-in AI.
    Scripted,
    /// The built-in heuristic decides.
    BuiltinAi,
}

/// One side of a battle.
///
/// Every member's `team` field equals this team's `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub controller: ControllerKind,
    pub members: Vec<CombatantId>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, controller: ControllerKind) -> Self {
        Self {
            id,
            name: name.into(),
            controller,
            members: Vec::new(),
        }
    }
}
