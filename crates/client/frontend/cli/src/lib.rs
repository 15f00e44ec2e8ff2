//! Terminal frontend for scripted battles.
//!
//! This crate provides a line-oriented terminal presentation of a battle.
//! It implements the `client_bootstrap::Frontend` trait.
//!
//! # Architecture
//!
//! CliFrontend is a pure presentation layer that:
//! - Registers a console presenter as an event sink, so output follows the
//!   exact order of battle events
//! - Reads player decisions from stdin
//! - Optionally mirrors every event to a JSON-lines file
//! - Does NOT own the battle controller

mod app;
mod config;
mod input;
pub mod logging;
pub mod presenter;

pub use app::CliFrontend;
pub use config::{CliConfig, UiConfig};
pub use input::LinePlayerInput;
pub use presenter::ConsolePresenter;
