//! Runner bookkeeping around a journey: artifacts, timeouts, browser close

mod common;

use std::path::Path;
use std::time::Duration;

use common::*;
use journeycheck_common::Viewport;
use journeycheck_e2e::{Browser, Command, GuiRunner, PlaywrightConfig, RunnerConfig};

fn runner_config(output_dir: &Path, test_timeout: Duration) -> RunnerConfig {
    RunnerConfig {
        playwright: PlaywrightConfig {
            action_timeout: Duration::from_millis(50),
            navigation_timeout: Duration::from_millis(50),
            expect_timeout: Duration::from_millis(50),
            ..PlaywrightConfig::default()
        },
        output_dir: output_dir.to_path_buf(),
        test_timeout,
        ..RunnerConfig::default()
    }
}

fn artifacts_left(output_dir: &Path) -> usize {
    match std::fs::read_dir(output_dir.join("artifacts")) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

fn closed_with(driver: &FakeDriver) -> Option<bool> {
    driver.commands().into_iter().find_map(|c| match c {
        Command::Close { retain_artifacts, .. } => Some(retain_artifacts),
        _ => None,
    })
}

#[tokio::test]
async fn passing_journey_leaves_no_artifacts() {
    let output = tempfile::tempdir().unwrap();
    let launcher = FakeLauncher::new(FakeSite::happy());
    let runner = GuiRunner::with_launcher(
        runner_config(output.path(), Duration::from_secs(10)),
        urls(),
        launcher.clone(),
    );

    let result = runner.run_journey(Browser::Chromium, Viewport::DESKTOP).await;

    assert!(result.success, "journey failed: {:?}", result.error);
    assert!(result.artifacts.is_empty());
    assert_eq!(artifacts_left(output.path()), 0);
    assert_eq!(closed_with(&launcher.launched()[0]), Some(false));
}

#[tokio::test]
async fn failing_journey_keeps_screenshot_and_trace() {
    let output = tempfile::tempdir().unwrap();
    let mut site = FakeSite::happy();
    site.attributes.insert(
        (first_result().to_string(), "href".to_string()),
        "https://www.example.com/".to_string(),
    );
    let launcher = FakeLauncher::new(site);
    let runner = GuiRunner::with_launcher(
        runner_config(output.path(), Duration::from_secs(10)),
        urls(),
        launcher.clone(),
    );

    let result = runner.run_journey(Browser::Firefox, Viewport::MOBILE).await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("first search result href"));
    let names: Vec<_> = result
        .artifacts
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["failure.png", "trace.zip"]);
    assert!(result.artifacts[0].starts_with(output.path().join("artifacts")));
    assert_eq!(artifacts_left(output.path()), 1);

    let launched = launcher.launched();
    let driver = &launched[0];
    assert!(driver
        .commands()
        .iter()
        .any(|c| matches!(c, Command::Screenshot { full_page: true, .. })));
    assert_eq!(closed_with(driver), Some(true));
}

#[tokio::test]
async fn hung_step_fails_with_test_timeout() {
    let output = tempfile::tempdir().unwrap();
    let mut site = FakeSite::happy();
    site.stalled.insert(cookie_button().to_string());
    let launcher = FakeLauncher::new(site);
    let runner = GuiRunner::with_launcher(
        runner_config(output.path(), Duration::from_millis(200)),
        urls(),
        launcher.clone(),
    );

    let result = runner.run_journey(Browser::Chromium, Viewport::DESKTOP).await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("Timeout after 200 ms"), "{}", error);
    assert!(error.contains("[chromium] Viewport: Desktop"), "{}", error);
    assert!(result
        .artifacts
        .iter()
        .any(|p| p.ends_with("failure.png")));
    assert_eq!(closed_with(&launcher.launched()[0]), Some(true));
}

#[tokio::test]
async fn run_all_launches_once_per_browser_and_viewport() {
    let output = tempfile::tempdir().unwrap();
    let launcher = FakeLauncher::new(FakeSite::happy());
    let config = RunnerConfig {
        browsers: vec![Browser::Chromium, Browser::Webkit],
        viewports: Viewport::ALL.to_vec(),
        ..runner_config(output.path(), Duration::from_secs(10))
    };
    let runner = GuiRunner::with_launcher(config, urls(), launcher.clone());

    let suite = runner.run_all().await;

    assert_eq!(suite.suite, "gui");
    assert_eq!(suite.total, 2 * Viewport::ALL.len());
    assert!(suite.all_passed(), "failures: {:?}", suite.results);
    assert_eq!(launcher.launched().len(), suite.total);
}
