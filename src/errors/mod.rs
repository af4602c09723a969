//! Domain-specific error types for the Flood harness
//!
//! This module provides structured error types using `thiserror`. Note that
//! per-session I/O faults are deliberately not represented here: they are
//! classified into a `SessionOutcome` at the session boundary and folded into
//! the aggregate report instead of propagating.

use thiserror::Error;

/// Main error type for the Flood application
#[derive(Error, Debug)]
pub enum FloodError {
    /// Configuration-related errors (CLI parsing, validation, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type using FloodError
pub type Result<T> = std::result::Result<T, FloodError>;

// Convenience constructors
impl FloodError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        FloodError::Config(msg.into())
    }
}
