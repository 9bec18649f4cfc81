//! WageKit error taxonomy.

/// Result alias used across all WageKit crates.
pub type Result<T> = std::result::Result<T, WagekitError>;

/// Unified error type for the WageKit backend.
#[derive(Debug, thiserror::Error)]
pub enum WagekitError {
    /// Configuration load/parse/validation failure.
    #[error("Config error: {0}")]
    Config(String),

    /// Store (settings/document/worker) access failure.
    #[error("Store error: {0}")]
    Store(String),

    /// A referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Notification delivery failure.
    #[error("Notify error: {0}")]
    Notify(String),

    /// Invalid or malformed field value (status, notification type, time).
    #[error("Invalid value: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WagekitError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// True when the error is a missing-record lookup (skippable per document).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
