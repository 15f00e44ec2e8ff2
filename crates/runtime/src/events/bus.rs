//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::sink::EventSink;
use super::types::BattleEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle and round lifecycle
    Battle,
    /// Per-turn actions and their effects
    Turn,
    /// Fallbacks and script failures
    Diagnostics,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Battle, Topic::Turn, Topic::Diagnostics];

    pub fn of(event: &BattleEvent) -> Self {
        match event {
            BattleEvent::BattleStarted { .. }
            | BattleEvent::RoundStarted { .. }
            | BattleEvent::RoundEnded { .. }
            | BattleEvent::BattleEnded { .. } => Topic::Battle,
            BattleEvent::TurnStarted { .. }
            | BattleEvent::ActionTaken { .. }
            | BattleEvent::EffectApplied { .. }
            | BattleEvent::NoAction { .. }
            | BattleEvent::CombatantDefeated { .. } => Topic::Turn,
            BattleEvent::DecisionFallback { .. } | BattleEvent::ScriptFailed { .. } => {
                Topic::Diagnostics
            }
        }
    }
}

struct Channels {
    battle: broadcast::Sender<BattleEvent>,
    turn: broadcast::Sender<BattleEvent>,
    diagnostics: broadcast::Sender<BattleEvent>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events published while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                battle: broadcast::channel(capacity).0,
                turn: broadcast::channel(capacity).0,
                diagnostics: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<BattleEvent> {
        match topic {
            Topic::Battle => &self.channels.battle,
            Topic::Turn => &self.channels.turn,
            Topic::Diagnostics => &self.channels.diagnostics,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: BattleEvent) {
        let topic = Topic::of(&event);
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: &BattleEvent) {
        self.publish(event.clone());
    }
}
