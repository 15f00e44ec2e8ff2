//! Common error infrastructure shared by game-core and the crates above it.
//!
//! Domain errors (`SetupError` here, script and runtime errors in `runtime`)
//! implement [`GameError`] so callers can pick a recovery strategy without
//! matching on every variant.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The battle continues through a fallback (built-in AI, basic attack).
    ///
    /// Examples: script runtime error, closed input stream
    Recoverable,

    /// Invalid input that was rejected.
    ///
    /// Examples: malformed AI decision, missing script entry point
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,

    /// The battle cannot start or continue.
    ///
    /// Examples: unknown character reference, fewer than two teams
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if a fallback lets the battle go on.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for errors raised while setting up or running a battle.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for the variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
