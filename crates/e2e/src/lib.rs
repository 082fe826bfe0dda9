//! Journeycheck browser journey suite
//!
//! This crate drives Playwright from Rust to check the search engine →
//! MoroSystems → career page journey:
//! - Launches one Playwright bridge (node child process) per test
//! - Exposes the bridge's page through typed page objects
//! - Repeats the journey per browser and viewport
//! - Keeps screenshot, trace and video of failed runs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    GuiRunner (Rust)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  run_journey(browser, viewport) -> TestResult               │
//! │    ├── Launcher::launch()   (node + playwright bridge)      │
//! │    ├── Page  ── JSON lines ──▶ bridge  ──▶ browser tab      │
//! │    ├── GuiContext { google, moro_home, moro_career }        │
//! │    ├── career_journey(gui, viewport, case)                  │
//! │    └── on failure: screenshot, trace.zip, video             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod context;
pub mod error;
pub mod journey;
pub mod locator;
pub mod page;
pub mod pages;
pub mod playwright;
pub mod runner;

pub use context::GuiContext;
pub use error::{E2eError, E2eResult};
pub use locator::Locator;
pub use page::{Page, Timeouts};
pub use playwright::{Browser, Command, Driver, Launcher, PlaywrightBridge, PlaywrightConfig, PlaywrightLauncher};
pub use runner::{GuiRunner, RunnerConfig};
