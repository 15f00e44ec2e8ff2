//! Combat resolution formulas.
//!
//! This module provides pure functions for resolving damage and healing.
//! Every path that changes hit points (scripted abilities through the sandbox
//! mutators, and the basic-attack fallback) goes through these functions, so
//! the rules are applied uniformly.
//!
//! # Core Functions
//!
//! - `calculate_damage`: Base damage against (possibly doubled) defense, minimum 1
//! - `apply_damage`: HP reduction (clamped to 0)
//! - `calculate_heal` / `apply_heal`: Non-negative heal clamped to max HP
//! - `basic_attack_damage`: Base damage of the fallback attack

pub mod damage;
pub mod heal;
pub mod result;

pub use damage::{
    MINIMUM_DAMAGE, apply_damage, basic_attack_damage, calculate_damage, effective_defense,
};
pub use heal::{apply_heal, calculate_heal};
pub use result::{DamageOutcome, HealOutcome};
