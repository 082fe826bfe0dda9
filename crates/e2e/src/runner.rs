//! Runs the career journey per browser and viewport, keeping diagnostics of failures

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use journeycheck_common::config::GuiUrls;
use journeycheck_common::{TestCase, TestResult, TestSuiteResult, Viewport};

use crate::context::GuiContext;
use crate::error::{E2eError, E2eResult};
use crate::journey::career_journey;
use crate::page::Page;
use crate::playwright::{check_playwright_installed, Browser, Launcher, PlaywrightConfig, PlaywrightLauncher};

/// Main browser journey runner
pub struct GuiRunner {
    config: RunnerConfig,
    urls: GuiUrls,
    launcher: Arc<dyn Launcher>,
}

impl GuiRunner {
    /// Create a runner, failing early when Playwright is not installed
    pub async fn new(config: RunnerConfig, urls: GuiUrls) -> E2eResult<Self> {
        check_playwright_installed().await?;
        let launcher = Arc::new(PlaywrightLauncher::new(config.playwright.clone()));
        Ok(Self::with_launcher(config, urls, launcher))
    }

    /// Create a runner that starts browsers through `launcher`
    pub fn with_launcher(config: RunnerConfig, urls: GuiUrls, launcher: Arc<dyn Launcher>) -> Self {
        Self { config, urls, launcher }
    }

    /// Run the journey for every configured browser and viewport
    pub async fn run_all(&self) -> TestSuiteResult {
        let started_at = Utc::now();
        let mut results = Vec::new();

        info!(
            "Running {} journey(s)...",
            self.config.browsers.len() * self.config.viewports.len()
        );

        for browser in &self.config.browsers {
            for viewport in &self.config.viewports {
                results.push(self.run_journey(*browser, *viewport).await);
            }
        }

        TestSuiteResult::collect("gui", started_at, results)
    }

    /// Run one journey in a fresh browser
    pub async fn run_journey(&self, browser: Browser, viewport: Viewport) -> TestResult {
        let name = format!("[{}] Viewport: {}", browser, viewport.label());
        let mut case = TestCase::new(&name);
        let artifact_dir = self.config.output_dir.join("artifacts").join(slug(&name));

        let driver = match self.launcher.launch(browser, viewport, &artifact_dir).await {
            Ok(driver) => driver,
            Err(e) => return case.finish(Err(e)),
        };
        let page = Page::new(driver.clone(), self.config.playwright.timeouts());
        let gui = GuiContext::new(page.clone(), &self.urls);

        let outcome = match tokio::time::timeout(
            self.config.test_timeout,
            drive(&gui, &viewport, &mut case),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(E2eError::Timeout {
                target: format!("test '{}'", name),
                timeout_ms: self.config.test_timeout.as_millis() as u64,
            }),
        };

        let failed = outcome.is_err();
        if failed {
            std::fs::create_dir_all(&artifact_dir).ok();
            let screenshot = artifact_dir.join("failure.png");
            match page.screenshot(&screenshot, true).await {
                Ok(()) => case.attach(screenshot),
                Err(e) => warn!("Could not capture failure screenshot: {}", e),
            }
        }

        let trace_path = artifact_dir.join("trace.zip");
        match driver.close(failed, Some(&trace_path)).await {
            Ok(video) => {
                if failed && self.config.playwright.record_trace {
                    case.attach(trace_path);
                }
                if let Some(video) = video {
                    case.attach(video);
                }
            }
            Err(e) => warn!("Browser did not close cleanly: {}", e),
        }

        if !failed {
            remove_empty_dirs(&artifact_dir);
        }

        case.finish(outcome)
    }
}

async fn drive(gui: &GuiContext, viewport: &Viewport, case: &mut TestCase) -> E2eResult<()> {
    gui.page().set_viewport(viewport).await?;
    career_journey(gui, viewport, case).await
}

fn remove_empty_dirs(artifact_dir: &Path) {
    let _ = std::fs::remove_dir(artifact_dir.join("video"));
    let _ = std::fs::remove_dir(artifact_dir);
}

/// File-system friendly form of a test name
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Configuration for the journey runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub playwright: PlaywrightConfig,
    pub browsers: Vec<Browser>,
    pub viewports: Vec<Viewport>,
    pub output_dir: PathBuf,
    pub test_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            playwright: PlaywrightConfig::default(),
            browsers: vec![Browser::Chromium],
            viewports: vec![Viewport::DESKTOP],
            output_dir: PathBuf::from("test-results"),
            test_timeout: Duration::from_secs(60),
        }
    }
}
