//! Per-test results, step recording and the suite summary

use std::fmt::Display;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{Error, Result};

/// Result of executing one named step of a test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
    /// Diagnostics kept for failed tests (screenshot, trace, video)
    #[serde(default)]
    pub artifacts: Vec<PathBuf>,
}

/// Result of running a whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

/// Records the steps of one running test
#[derive(Debug)]
pub struct TestCase {
    name: String,
    started: Instant,
    steps: Vec<StepResult>,
    artifacts: Vec<PathBuf>,
}

impl TestCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            steps: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `fut` as a named step and record its outcome
    pub async fn step<T, E, F>(&mut self, name: &str, fut: F) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        let start = Instant::now();
        debug!("[{}] step: {}", self.name, name);

        let outcome = fut.await;

        self.steps.push(StepResult {
            success: outcome.is_ok(),
            step_name: name.to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
            error: outcome.as_ref().err().map(|e| e.to_string()),
        });
        outcome
    }

    /// Keep a diagnostic file with this test's result
    pub fn attach(&mut self, path: PathBuf) {
        self.artifacts.push(path);
    }

    /// Close the test with its overall outcome
    pub fn finish<E: Display>(self, outcome: std::result::Result<(), E>) -> TestResult {
        let duration_ms = self.started.elapsed().as_millis() as u64;
        let error = outcome.err().map(|e| {
            match self.steps.last().filter(|s| !s.success) {
                Some(step) => Error::StepFailed {
                    step: step.step_name.clone(),
                    reason: e.to_string(),
                }
                .to_string(),
                None => e.to_string(),
            }
        });

        TestResult {
            name: self.name,
            success: error.is_none(),
            duration_ms,
            steps: self.steps,
            error,
            artifacts: self.artifacts,
        }
    }
}

impl TestSuiteResult {
    /// Aggregate individual results, logging each outcome
    pub fn collect(suite: &str, started_at: DateTime<Utc>, results: Vec<TestResult>) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = (Utc::now() - started_at).num_milliseconds().max(0) as u64;

        for result in &results {
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        info!(
            "{}: {} passed, {} failed ({} ms)",
            suite, passed, failed, duration_ms
        );

        Self {
            suite: suite.to_string(),
            started_at,
            total: results.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Fold another suite's results into this one
    pub fn merge(mut self, other: TestSuiteResult) -> Self {
        self.suite = format!("{}+{}", self.suite, other.suite);
        self.started_at = self.started_at.min(other.started_at);
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.duration_ms += other.duration_ms;
        self.results.extend(other.results);
        self
    }
}

/// Write suite results to `<output_dir>/test-results.json`
pub fn write_results(output_dir: &Path, results: &TestSuiteResult) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}
