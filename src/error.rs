//! Error types for research-console.

use thiserror::Error;

/// Result type alias using research-console's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a research session.
///
/// Protocol anomalies such as an out-of-range subtopic index are not errors:
/// the controller logs and drops them. Only the cases below ever reach a caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected user input (empty topic on submit)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Inbound message could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Outbound channel is gone
    #[error("Transport error: {0}")]
    Transport(String),

    /// Presentation surface failed
    #[error("Display error: {0}")]
    Display(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a display error.
    pub fn display(message: impl Into<String>) -> Self {
        Self::Display(message.into())
    }

    /// Whether this error came from rejected user input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
