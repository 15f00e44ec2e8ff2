use strum::{AsRefStr, Display};

use super::rng::{PcgRng, RngOracle, compute_seed};
use crate::state::{Combatant, CombatantId};

/// How combatants with equal speed are ordered within a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TieBreak {
    /// Ascending roster position.
    #[default]
    RosterOrder,
    /// One random key per combatant per round drawn from the seed, then roster
    /// position.
    Seeded(u64),
}

/// Sort key for one scheduled combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct TurnKey {
    /// Negated so that ascending order yields the fastest first.
    speed: core::cmp::Reverse<i32>,
    tie: u32,
    id: CombatantId,
}

/// Orders the living combatants for one round.
///
/// Descending speed; ties resolved by `tie_break`. Defeated combatants are
/// left out. The result is a strict total order, so the same inputs always
/// yield the same sequence.
pub fn compute_turn_order(
    combatants: &[Combatant],
    tie_break: TieBreak,
    round: u32,
) -> Vec<CombatantId> {
    let rng = PcgRng;

    let mut keys: Vec<TurnKey> = combatants
        .iter()
        .filter(|combatant| combatant.is_alive())
        .map(|combatant| {
            let tie = match tie_break {
                TieBreak::RosterOrder => 0,
                TieBreak::Seeded(seed) => {
                    rng.next_u32(compute_seed(seed, round, combatant.id.0, 0))
                }
            };
            TurnKey {
                speed: core::cmp::Reverse(combatant.stats.speed),
                tie,
                id: combatant.id,
            }
        })
        .collect();

    keys.sort_unstable();
    keys.into_iter().map(|key| key.id).collect()
}
