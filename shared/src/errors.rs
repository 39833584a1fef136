//! Error types for the TrainHub core

use thiserror::Error;
use uuid::Uuid;

/// Domain-level error taxonomy
///
/// Every variant is a recoverable validation failure surfaced to the
/// caller as a value. Nothing here should abort the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("scheduling conflict with appointment {conflicting_id}")]
    SchedulingConflict { conflicting_id: Uuid },

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),

    #[error("insufficient points: have {have}, need {need}")]
    InsufficientPoints { have: i64, need: i64 },

    #[error("level {required} required, client is level {current}")]
    InsufficientLevel { current: u32, required: u32 },

    #[error("reward is out of stock")]
    OutOfStock,

    #[error("ledger mismatch for client {client_id}: cached {cached}, replayed {replayed}")]
    LedgerMismatch {
        client_id: Uuid,
        cached: i64,
        replayed: i64,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
