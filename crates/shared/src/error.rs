//! Application-wide error type.
//!
//! Engine errors stay specific inside their crate and are folded into
//! [`AppError`] at the boundary, keeping their machine-readable code.

use thiserror::Error;

use crate::config::EngineConfigError;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Error as seen by whoever embeds the engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// The caller supplied records the engine refuses to process.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Machine-readable code of the underlying error.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// A collaborator (rate oracle, expense source) failed. Retrying may help.
    #[error("Dependency unavailable: {message}")]
    Unavailable {
        /// Machine-readable code of the underlying error.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },

    /// Engine settings could not be loaded or are out of range.
    #[error("Configuration error: {0}")]
    Config(#[from] EngineConfigError),

    /// The engine reached a state its invariants rule out.
    #[error("Internal error: {message}")]
    Internal {
        /// Machine-readable code of the underlying error.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },
}

impl AppError {
    /// Returns the HTTP status code a transport layer should use.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::Unavailable { .. } => 503,
            Self::Config(_) | Self::Internal { .. } => 500,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { code, .. }
            | Self::Unavailable { code, .. }
            | Self::Internal { code, .. } => code,
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Returns true if the same request may succeed later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
