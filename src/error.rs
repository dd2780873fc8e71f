//! Error types for the payoff engine
//!
//! Projection results never use these: non-convergence and infeasible targets are
//! ordinary return values. Errors are reserved for malformed input at the boundary.

use thiserror::Error;

/// Errors raised while loading snapshots or recording ledger events
#[derive(Error, Debug)]
pub enum EngineError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A quarter label that is not of the form `Qn YYYY`
    #[error("Invalid quarter label: {0}")]
    InvalidQuarter(String),

    /// Split percentages that do not add up to 100
    #[error("Income splits must total 100%, got {total:.2}%")]
    InvalidSplits { total: f64 },

    /// No debt with the given identifier or name
    #[error("Debt not found: {0}")]
    DebtNotFound(String),

    /// Validation errors for ledger data
    #[error("Validation error: {0}")]
    Validation(String),
}

impl EngineError {
    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidSplits { .. })
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, EngineError>;
