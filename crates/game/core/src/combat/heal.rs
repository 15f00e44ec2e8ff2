//! Healing calculation and application.

/// Amount actually restored by a heal request; negative requests heal nothing.
pub fn calculate_heal(amount: i32) -> u32 {
    amount.max(0) as u32
}

/// Apply healing to current HP, clamped to `max_hp`.
pub fn apply_heal(current_hp: u32, max_hp: u32, heal: u32) -> u32 {
    current_hp.saturating_add(heal).min(max_hp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heal_clamps_to_max() {
        assert_eq!(apply_heal(80, 100, calculate_heal(30)), 100);
        assert_eq!(apply_heal(50, 100, calculate_heal(30)), 80);
    }

    #[test]
    fn negative_heal_is_ignored() {
        assert_eq!(calculate_heal(-20), 0);
        assert_eq!(apply_heal(40, 100, calculate_heal(-20)), 40);
    }
}
