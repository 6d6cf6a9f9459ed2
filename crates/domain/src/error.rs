//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// No request with the given id exists in the collection.
    #[error("request {0} not found")]
    RequestNotFound(u64),

    /// No environment with the given id exists.
    #[error("environment '{0}' not found")]
    EnvironmentNotFound(String),

    /// No history entry at the given position.
    #[error("history entry {0} not found")]
    HistoryEntryNotFound(usize),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
