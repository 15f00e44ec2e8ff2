//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on battle orchestration.

pub mod errors;
pub mod input;

pub use errors::{Result, RuntimeError};
pub use input::{
    AbilityOption, ChannelPlayerInput, DecisionRequest, PlayerChoice, PlayerInput, TargetOption,
};
