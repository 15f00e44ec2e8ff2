//! Ability definitions and the immutable ability catalog.
//!
//! An ability is pure data: a display name, a description, a reference to the
//! effect script that implements it, and the set of combatants it may target.
//! Abilities never change during a battle and are shared by reference between
//! every combatant that knows them.

mod catalog;
mod target;

pub use catalog::AbilityCatalog;
pub use target::TargetScope;

use std::borrow::Borrow;
use std::fmt;

/// Identifier used by blueprints, scripts, and the catalog to refer to an ability.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(String);

impl AbilityId {
    /// Identifier of the ability the built-in policy prefers.
    pub const BASIC_ATTACK: &'static str = "attack";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AbilityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AbilityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static definition of an ability.
///
/// The `id` is not part of the data file entry itself; loaders assign it from
/// the key the entry was stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    #[cfg_attr(feature = "serde", serde(skip))]
    pub id: AbilityId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Script reference, resolved relative to the configured scripts root.
    pub script: String,
    /// Which combatants this ability may be aimed at.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetScope,
}

impl Ability {
    pub fn new(
        id: impl Into<AbilityId>,
        name: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            script: script.into(),
            target: TargetScope::default(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetScope) -> Self {
        self.target = target;
        self
    }

    /// Returns true when this is the ability the built-in policy reaches for first.
    ///
    /// Matches on either the identifier or the display name, ignoring case.
    pub fn is_basic_attack(&self) -> bool {
        self.id.as_str().eq_ignore_ascii_case(AbilityId::BASIC_ATTACK)
            || self.name.eq_ignore_ascii_case(AbilityId::BASIC_ATTACK)
    }
}
