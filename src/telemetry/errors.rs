//! # Telemetry Errors
//!
//! Error types for ingestion and state access.

use thiserror::Error;

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Telemetry errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TelemetryError {
    /// Malformed ingestion payload
    #[error("{0}")]
    Validation(String),

    /// State could not be accessed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TelemetryError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Error used when the state lock was poisoned by a panicking writer
    pub(crate) fn lock_poisoned() -> Self {
        Self::Internal("Lock poisoned".into())
    }
}
