//! Browser journey suite

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use tracing::warn;

use journeycheck_common::{Settings, TestCase, TestSuiteResult, Viewport};
use journeycheck_e2e::{Browser, GuiRunner, RunnerConfig};

#[derive(Args, Debug, Clone)]
pub struct GuiArgs {
    /// Browser to run the journey in (repeatable)
    #[arg(long = "browser", value_name = "BROWSER", default_value = "chromium")]
    pub browsers: Vec<Browser>,

    /// Viewport to run the journey at (repeatable)
    #[arg(long = "viewport", value_enum, default_value = "desktop")]
    pub viewports: Vec<ViewportArg>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewportArg {
    Desktop,
    Tablet,
    Mobile,
    All,
}

impl GuiArgs {
    pub fn runner_config(&self, output_dir: &Path) -> RunnerConfig {
        let mut config = RunnerConfig {
            browsers: dedup(self.browsers.clone()),
            viewports: expand_viewports(&self.viewports),
            output_dir: output_dir.to_path_buf(),
            ..RunnerConfig::default()
        };
        config.playwright.headless = !self.headed;
        config
    }
}

pub async fn execute(args: &GuiArgs, settings: &Settings, output_dir: &Path) -> Result<TestSuiteResult> {
    let runner = GuiRunner::new(args.runner_config(output_dir), settings.gui.clone()).await?;
    Ok(runner.run_all().await)
}

/// Report a suite that could not start as one failed test
pub fn or_failed_setup(outcome: Result<TestSuiteResult>) -> TestSuiteResult {
    outcome.unwrap_or_else(|e| {
        warn!("Browser journey could not start: {:#}", e);
        let started_at = Utc::now();
        let result = TestCase::new(SETUP_TEST_NAME).finish(Err(format!("{:#}", e)));
        TestSuiteResult::collect("gui", started_at, vec![result])
    })
}

pub const SETUP_TEST_NAME: &str = "[gui] setup";

fn expand_viewports(args: &[ViewportArg]) -> Vec<Viewport> {
    let expanded = args
        .iter()
        .flat_map(|arg| match arg {
            ViewportArg::Desktop => vec![Viewport::DESKTOP],
            ViewportArg::Tablet => vec![Viewport::TABLET],
            ViewportArg::Mobile => vec![Viewport::MOBILE],
            ViewportArg::All => Viewport::ALL.to_vec(),
        })
        .collect();
    dedup(expanded)
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
