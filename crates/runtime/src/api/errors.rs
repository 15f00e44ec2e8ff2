//! Unified error types surfaced by the runtime API.
//!
//! Setup failures are fatal; everything raised while a battle is running is
//! logged and absorbed by a fallback so one bad collaborator never aborts the
//! battle.
use game_core::{ErrorSeverity, GameError, SetupError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("battle controller requires a script host before building")]
    MissingScriptHost,

    #[error("battle controller requires a roster before building")]
    MissingRoster,

    #[error("player input channel closed")]
    PlayerInputClosed,

    #[error("player input failed: {0}")]
    PlayerInput(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(_) | Self::MissingScriptHost | Self::MissingRoster => ErrorSeverity::Fatal,
            Self::PlayerInputClosed | Self::PlayerInput(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Setup(inner) => inner.error_code(),
            Self::MissingScriptHost => "RUNTIME_MISSING_SCRIPT_HOST",
            Self::MissingRoster => "RUNTIME_MISSING_ROSTER",
            Self::PlayerInputClosed => "RUNTIME_PLAYER_INPUT_CLOSED",
            Self::PlayerInput(_) => "RUNTIME_PLAYER_INPUT",
        }
    }
}
