use game_core::{ErrorSeverity, GameError};
use thiserror::Error;

/// Failure raised while running an ability or AI script.
///
/// Always recovered locally: abilities fall back to a basic attack, AI
/// decisions fall through to the built-in AI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("script `{reference}` could not be loaded: {message}")]
    ScriptNotFound { reference: String, message: String },

    #[error("script `{reference}` does not define `{entry_point}`")]
    MissingEntryPoint {
        reference: String,
        entry_point: &'static str,
    },

    #[error("script `{reference}` returned a malformed decision: {reason}")]
    MalformedDecision { reference: String, reason: String },

    #[error("script `{reference}` failed: {message}")]
    Runtime { reference: String, message: String },

    #[error("script `{reference}` exceeded its execution budget of {budget_ms}ms")]
    Budget { reference: String, budget_ms: u64 },

    #[error("script worker failed: {0}")]
    Worker(String),
}

impl ScriptError {
    pub fn runtime(reference: &str, message: impl Into<String>) -> Self {
        Self::Runtime {
            reference: reference.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDecision {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

impl GameError for ScriptError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ScriptNotFound { .. }
            | Self::MissingEntryPoint { .. }
            | Self::MalformedDecision { .. } => ErrorSeverity::Validation,
            Self::Runtime { .. } | Self::Budget { .. } => ErrorSeverity::Recoverable,
            Self::Worker(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ScriptNotFound { .. } => "SCRIPT_NOT_FOUND",
            Self::MissingEntryPoint { .. } => "SCRIPT_MISSING_ENTRY_POINT",
            Self::MalformedDecision { .. } => "SCRIPT_MALFORMED_DECISION",
            Self::Runtime { .. } => "SCRIPT_RUNTIME",
            Self::Budget { .. } => "SCRIPT_BUDGET",
            Self::Worker(_) => "SCRIPT_WORKER",
        }
    }
}
