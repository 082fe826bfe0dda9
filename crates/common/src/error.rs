//! Error types shared by the journeycheck suites

use thiserror::Error;

/// Result type alias using the shared suite Error
pub type Result<T> = std::result::Result<T, Error>;

/// Suite-level error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required environment variable: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Assertion failed: {context}\n  expected: {expected}\n  actual:   {actual}")]
    AssertionFailed {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an assertion failure from anything displayable
    pub fn assertion(
        context: impl Into<String>,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Error::AssertionFailed {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Whether this error is a configuration problem that must abort the run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingConfiguration(_) | Error::InvalidConfiguration(_)
        )
    }
}
