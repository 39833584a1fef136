//! TrainHub Shared Library
//!
//! This crate contains the domain types, error taxonomy, validation
//! helpers, and pure time utilities shared across the engine and any
//! host application built on top of it.

pub mod errors;
pub mod models;
pub mod time;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;
