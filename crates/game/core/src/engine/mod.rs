//! Battle rules that sit above the raw state: setup, turn order, and outcome.
//!
//! The runtime drives the round loop; everything here is deterministic and
//! free of I/O so the same inputs always reproduce the same battle.

mod errors;
mod rng;
mod setup;
mod turns;

pub use errors::SetupError;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use setup::setup_battle;
pub use turns::{TieBreak, compute_turn_order};

use crate::state::TeamId;

/// Why a battle ended without a winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DrawReason {
    /// The last action left no team with a living member.
    MutualElimination,
    /// The configured round cap was reached.
    RoundLimit,
}

/// Terminal result of a battle. Exactly one is reported per battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Victory { team: TeamId, name: String },
    Draw { reason: DrawReason },
}

impl BattleOutcome {
    pub fn victory(team: TeamId, name: String) -> Self {
        Self::Victory { team, name }
    }

    pub fn mutual_elimination() -> Self {
        Self::Draw {
            reason: DrawReason::MutualElimination,
        }
    }

    pub fn round_limit() -> Self {
        Self::Draw {
            reason: DrawReason::RoundLimit,
        }
    }

    pub fn winner(&self) -> Option<TeamId> {
        match self {
            Self::Victory { team, .. } => Some(*team),
            Self::Draw { .. } => None,
        }
    }
}
