//! Trait describing a runnable client front-end.
use anyhow::Result;
use async_trait::async_trait;
use runtime::{BattleControllerBuilder, BattleReport};

/// Frontend abstraction for presentation layers.
///
/// A frontend never owns the battle. It plugs its event sinks and player
/// input into the controller builder before the battle starts, and is handed
/// the final report once it is over.
///
/// # Implementations
///
/// - `CliFrontend`: line-based terminal presentation (crossterm styling)
#[async_trait]
pub trait Frontend: Send {
    /// Registers sinks and player input on the controller about to be built.
    fn attach(&mut self, builder: BattleControllerBuilder) -> Result<BattleControllerBuilder>;

    /// Presents the outcome. Called once, after the last event was emitted.
    async fn finish(&mut self, report: &BattleReport) -> Result<()>;
}
