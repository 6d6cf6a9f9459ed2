//! Application error types

use nexus_domain::DomainError;
use thiserror::Error;

use crate::compiler::CompileError;
use crate::import::ImportError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain lookup or validation failed.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// The request could not be compiled.
    #[error("{0}")]
    Compile(#[from] CompileError),

    /// An import payload was rejected.
    #[error("{0}")]
    Import(#[from] ImportError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
