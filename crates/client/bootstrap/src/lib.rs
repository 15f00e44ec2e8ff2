//! Shared bootstrap utilities for client front-ends.
//!
//! Provides environment configuration, content loading, and battle controller
//! assembly that can be reused by the CLI or any other front-end crate.
pub mod builder;
pub mod config;
pub mod frontend;

pub use builder::{BattleBuilder, BattleSetup};
pub use config::ClientConfig;
pub use frontend::Frontend;
