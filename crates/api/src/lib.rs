//! Journeycheck ToDo Tasks API suite
//!
//! CRUD and state-transition checks for the Task API:
//! - [`TodoClient`] issues the raw requests
//! - [`TaskHarness`] creates and deletes tasks with contract checks
//! - [`Fixtures`] deletes every task a scenario created
//! - [`ApiScenario`] is the catalogue, [`ApiRunner`] runs it

pub mod client;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod runner;
pub mod scenarios;

pub use client::{ApiResponse, TodoClient};
pub use error::{ApiError, ApiResult};
pub use fixtures::Fixtures;
pub use harness::TaskHarness;
pub use runner::ApiRunner;
pub use scenarios::ApiScenario;
