//! Runtime orchestration for scripted turn-based battles.
//!
//! This crate wires the deterministic rules of `game-core` to the outside
//! world: script hosts that run ability and AI scripts, the player-input
//! abstraction, the per-turn action resolver and the battle controller that
//! drives a battle to its outcome while emitting events.
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the battle state machine and its builder
//! - [`resolver`] resolves a single combatant's turn
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the event types, sinks and topic-based event bus
//! - [`script`] runs ability and AI scripts in a sandbox
//! - [`providers`] holds the built-in AI heuristic
pub mod api;
pub mod controller;
pub mod events;
pub mod providers;
pub mod resolver;
pub mod script;

pub use api::{
    AbilityOption, ChannelPlayerInput, DecisionRequest, PlayerChoice, PlayerInput, Result,
    RuntimeError, TargetOption,
};
pub use controller::{BattleController, BattleControllerBuilder, BattleReport, RuntimeConfig};
pub use events::{
    BattleEvent, CombatantStatus, DecisionSource, EventBus, EventSink, FanoutSink, JsonLinesSink,
    RecordingSink, TeamSummary, Topic,
};
pub use providers::BuiltinAi;
pub use resolver::{ActionResolver, TurnOutcome};
pub use script::{
    AbilityEffect, AiChoice, AiDecision, AiTarget, CombatantHandle, EffectRecord, NativeScriptHost,
    ScriptError, ScriptHost,
};
#[cfg(feature = "lua")]
pub use script::{LuaScriptHost, ScriptBudget};
