//! Asynchronous abstraction for sourcing a human player's decisions.
//!
//! The resolver hands the collaborator a [`DecisionRequest`] listing only the
//! abilities the actor knows and the legal targets of each; the collaborator
//! answers with indices into those lists.
use std::sync::Arc;

use async_trait::async_trait;
use game_core::{Ability, Combatant, CombatantId};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};

use super::errors::{Result, RuntimeError};

/// One target the player may pick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOption {
    pub id: CombatantId,
    pub name: String,
    pub team_name: String,
    pub current_hp: u32,
    pub max_hp: u32,
}

impl From<&Combatant> for TargetOption {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            name: combatant.name.clone(),
            team_name: combatant.team_name.clone(),
            current_hp: combatant.current_hp(),
            max_hp: combatant.max_hp(),
        }
    }
}

/// An ability the actor knows, with its legal targets.
#[derive(Clone, Debug)]
pub struct AbilityOption {
    pub ability: Arc<Ability>,
    pub targets: Vec<TargetOption>,
}

/// Everything a player needs to decide one turn.
#[derive(Clone, Debug)]
pub struct DecisionRequest {
    pub round: u32,
    pub actor: Combatant,
    pub options: Vec<AbilityOption>,
}

/// Indices into [`DecisionRequest::options`] and the chosen option's targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerChoice {
    pub ability: usize,
    pub target: usize,
}

impl PlayerChoice {
    pub const fn new(ability: usize, target: usize) -> Self {
        Self { ability, target }
    }
}

/// Trait for providing a player's choice for one turn.
///
/// Implementations can handle:
/// - Interactive terminal input
/// - Scripted or replayed choices
/// - Testing fixtures
///
/// An error (for example a closed input stream) makes the resolver fall back
/// to the built-in AI for that turn.
#[async_trait]
pub trait PlayerInput: Send + Sync {
    async fn choose_action(&self, request: &DecisionRequest) -> Result<PlayerChoice>;
}

/// Player input fed through an mpsc channel.
///
/// Frontends push choices into the sender half; the receiver is owned here.
pub struct ChannelPlayerInput {
    rx: Mutex<mpsc::Receiver<PlayerChoice>>,
}

impl ChannelPlayerInput {
    pub fn new(rx: mpsc::Receiver<PlayerChoice>) -> Self {
        Self { rx: Mutex::new(rx) }
    }

    /// Creates a bounded channel and the input reading from it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<PlayerChoice>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl PlayerInput for ChannelPlayerInput {
    async fn choose_action(&self, _request: &DecisionRequest) -> Result<PlayerChoice> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(RuntimeError::PlayerInputClosed)
    }
}
