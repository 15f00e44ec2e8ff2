use strum::{AsRefStr, Display, EnumString};

/// The set of combatants an ability may legally be aimed at.
///
/// Each ability declares its own scope so heal-type abilities can target allies
/// while offensive abilities stay restricted to enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetScope {
    /// Living combatants on any other team.
    #[default]
    Enemies,
    /// Living combatants on the actor's own team, including the actor.
    Allies,
    /// Every living combatant.
    AnyAlive,
    /// Only the actor itself.
    SelfOnly,
}

impl TargetScope {
    /// Returns true if `candidate` is a legal target for `actor` under this scope.
    ///
    /// Liveness is checked separately by the caller.
    pub fn permits(self, actor_is_candidate: bool, same_team: bool) -> bool {
        match self {
            Self::Enemies => !same_team,
            Self::Allies => same_team,
            Self::AnyAlive => true,
            Self::SelfOnly => actor_is_candidate,
        }
    }
}
