//! Client builder with dependency injection pattern.

use anyhow::{Context, Result};
use client_bootstrap::{BattleSetup, Frontend};

use crate::Client;

/// Builder for constructing a [`Client`] with proper validation.
///
/// # Design Principles
///
/// - **Required fields**: battle setup and frontend must be provided
/// - **Fail-fast validation**: missing required fields cause build() to fail
/// - **Fluent API**: chainable methods for ergonomic construction
#[derive(Default)]
pub struct ClientBuilder {
    setup: Option<BattleSetup>,
    frontend: Option<Box<dyn Frontend>>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the battle setup (required).
    ///
    /// It should be constructed via `BattleBuilder` from the `client-bootstrap` crate.
    pub fn setup(mut self, setup: BattleSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the setup or the frontend is not set.
    pub fn build(self) -> Result<Client> {
        let setup = self
            .setup
            .context("Battle setup is required. Use .setup() to set it.")?;

        let frontend = self
            .frontend
            .context("Frontend is required. Use .frontend() to set it.")?;

        Ok(Client { setup, frontend })
    }
}
