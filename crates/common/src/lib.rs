//! Journeycheck Common Library
//!
//! Configuration, data model, assertion helpers and result reporting
//! shared by the browser journey suite and the ToDo Tasks API suite.

pub mod config;
pub mod error;
pub mod expect;
pub mod report;
pub mod types;

pub use config::Settings;
pub use error::{Error, Result};
pub use report::{StepResult, TestCase, TestResult, TestSuiteResult};
pub use types::{Task, Viewport};

use tracing_subscriber::EnvFilter;

/// Initialise logging for binaries. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

/// Initialise logging from tests; safe to call more than once
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
