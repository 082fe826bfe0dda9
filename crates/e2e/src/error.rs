//! Error types for the browser journey suite

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm install playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Playwright bridge exited unexpectedly")]
    BridgeClosed,

    #[error("Timeout after {timeout_ms} ms waiting for: {target}")]
    Timeout { target: String, timeout_ms: u64 },

    #[error(transparent)]
    Suite(#[from] journeycheck_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
