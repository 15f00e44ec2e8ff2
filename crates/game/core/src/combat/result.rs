//! Combat result types.

/// Result of applying one hit to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    /// Raw damage requested by the caller.
    pub base_damage: i32,

    /// Defense the hit was reduced by (doubled when defending).
    pub effective_defense: i32,

    /// HP actually removed.
    pub dealt: u32,

    /// HP left after the hit.
    pub remaining_hp: u32,

    /// True if this hit took the combatant from alive to defeated.
    pub defeated: bool,
}

/// Result of applying a heal to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealOutcome {
    /// Raw amount requested by the caller.
    pub requested: i32,

    /// HP actually restored after clamping to max HP.
    pub restored: u32,

    /// HP after the heal.
    pub current_hp: u32,
}
