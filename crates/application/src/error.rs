//! Application error types

use thiserror::Error;

/// Application-level errors.
///
/// Request outcomes never surface here; they are delivered through
/// callbacks. These errors only cover wiring the executor up.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// No tokio runtime was available to run transport calls on.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
