//! Damage calculation and application.

/// Smallest amount of damage a successful hit can deal.
///
/// Guarantees progress: with every attack value at least 1, any battle
/// eventually ends.
pub const MINIMUM_DAMAGE: u32 = 1;

// ============================================================================
// Damage Calculation
// ============================================================================

/// Defense value a hit is reduced by.
///
/// A defending combatant counts its defense twice.
pub fn effective_defense(defense: i32, is_defending: bool) -> i32 {
    if is_defending {
        defense.saturating_mul(2)
    } else {
        defense
    }
}

/// Calculate the damage a hit deals.
///
/// # Formula
///
/// ```text
/// effective_defense = is_defending ? defense * 2 : defense
/// final_damage      = max(MINIMUM_DAMAGE, base_damage - effective_defense)
/// ```
///
/// A `base_damage` of zero or less is not a hit at all and deals 0; that is the
/// only way to deal no damage.
///
/// # Arguments
///
/// * `base_damage` - Raw damage requested by the ability or fallback
/// * `defense` - Defender's defense stat
/// * `is_defending` - Whether the defender is in a defensive stance
pub fn calculate_damage(base_damage: i32, defense: i32, is_defending: bool) -> u32 {
    if base_damage <= 0 {
        return 0;
    }

    let reduced = i64::from(base_damage) - i64::from(effective_defense(defense, is_defending));
    let clamped = reduced.clamp(i64::from(MINIMUM_DAMAGE), i64::from(u32::MAX));
    clamped as u32
}

/// Apply damage to current HP.
///
/// # Returns
///
/// New HP value (clamped to 0)
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Base damage of the basic attack used when an ability script fails.
pub fn basic_attack_damage(attack: i32) -> i32 {
    attack.max(1)
}
