//! Topic-based event bus and synchronous sinks for battle events.
//!
//! The controller emits every event through an [`EventSink`]. The
//! [`EventBus`] is one such sink; it fans events out to async subscribers by
//! [`Topic`].

mod bus;
mod sink;
mod types;

pub use bus::{EventBus, Topic};
pub use sink::{EventSink, FanoutSink, JsonLinesSink, RecordingSink};
pub use types::{BattleEvent, CombatantStatus, DecisionSource, TeamSummary};
