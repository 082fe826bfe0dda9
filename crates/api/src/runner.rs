//! Runs API scenarios, each with its own fixtures

use chrono::Utc;
use tracing::info;

use journeycheck_common::{TestCase, TestResult, TestSuiteResult};

use crate::client::TodoClient;
use crate::error::ApiResult;
use crate::fixtures::Fixtures;
use crate::harness::TaskHarness;
use crate::scenarios::ApiScenario;

pub struct ApiRunner {
    harness: TaskHarness,
    scenarios: Vec<ApiScenario>,
}

impl ApiRunner {
    /// Runner for the whole catalogue against `base_url`
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Ok(Self::with_harness(TaskHarness::new(TodoClient::new(base_url)?)))
    }

    pub fn with_harness(harness: TaskHarness) -> Self {
        Self {
            harness,
            scenarios: ApiScenario::ALL.to_vec(),
        }
    }

    pub fn with_scenarios(mut self, scenarios: Vec<ApiScenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub async fn run_all(&self) -> TestSuiteResult {
        let started_at = Utc::now();
        info!(
            "Running {} API scenario(s) against {}",
            self.scenarios.len(),
            self.harness.client().base_url()
        );

        let mut results = Vec::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            results.push(self.run_scenario(*scenario).await);
        }

        TestSuiteResult::collect("api", started_at, results)
    }

    /// Run one scenario; its tasks are deleted even when it fails
    pub async fn run_scenario(&self, scenario: ApiScenario) -> TestResult {
        let mut case = TestCase::new(scenario.name());
        let mut fixtures = Fixtures::new(self.harness.clone());

        let outcome = case.step("scenario", scenario.run(&mut fixtures)).await;
        let cleanup = case.step("delete fixtures", fixtures.cleanup()).await;

        case.finish(outcome.and(cleanup))
    }
}
