//! Engine error handling
//!
//! Wraps the shared domain taxonomy and adds the lookup/internal
//! failure modes the service layer needs. Everything is surfaced as a
//! value; callers decide how to present it.

use thiserror::Error;
use trainhub_shared::errors::DomainError;

/// Engine-level error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// The underlying domain error, if this is a domain failure
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
