//! Domain error types.

use thiserror::Error;

/// Validation failures raised while building value objects from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is too long: {actual} characters (max {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Errors returned by the chat repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No session is bound to the connection
    #[error("No session bound to connection '{0}'")]
    SessionNotFound(String),

    /// The connection is already bound to a different presence identity
    #[error("Connection '{0}' is already bound to another identity")]
    ConnectionAlreadyBound(String),
}

/// Errors returned by a `MessagePusher`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to encode message: {0}")]
    EncodeFailed(String),
}
