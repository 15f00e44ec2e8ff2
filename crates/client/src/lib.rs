//! Top-level client composing the battle and a frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (composition root)
//!   ├─→ BattleSetup (content, rules, script host, controller builder)
//!   └─→ Frontend (presentation and player input)
//! ```
//!
//! The frontend plugs its sinks and input into the controller builder, the
//! client builds and runs the controller, and hands the final report back to
//! the frontend.

mod builder;

pub use builder::ClientBuilder;
pub use client_bootstrap::Frontend;

use anyhow::{Context, Result};
use client_bootstrap::BattleSetup;
use runtime::BattleReport;

/// Top-level client container.
pub struct Client {
    setup: BattleSetup,
    frontend: Box<dyn Frontend>,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Runs one battle to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend cannot attach (for example the event
    /// log cannot be created) or the battle cannot be set up. Nothing raised
    /// while the battle runs is an error here.
    pub async fn run(self) -> Result<BattleReport> {
        let Client { setup, mut frontend } = self;

        let builder = frontend.attach(setup.builder)?;
        let mut controller = builder.build().context("battle setup failed")?;

        let report = controller.run().await.context("battle aborted")?;
        frontend.finish(&report).await?;

        Ok(report)
    }
}
