//! Error types for the Task API suite

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{request} returned {actual}, expected {expected}: {body}")]
    UnexpectedStatus {
        request: String,
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Malformed response body from {request}: {reason}")]
    MalformedBody { request: String, reason: String },

    #[error(transparent)]
    Suite(#[from] journeycheck_common::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
