//! Per-scenario task fixtures

use serde_json::{json, Value};
use tracing::warn;

use journeycheck_common::Task;

use crate::client::TodoClient;
use crate::error::ApiResult;
use crate::harness::{check_created, TaskHarness};

/// Tracks every task a scenario creates so it can be deleted afterwards,
/// whatever the scenario's outcome.
pub struct Fixtures {
    harness: TaskHarness,
    created: Vec<String>,
}

impl Fixtures {
    pub fn new(harness: TaskHarness) -> Self {
        Self {
            harness,
            created: Vec::new(),
        }
    }

    pub fn client(&self) -> &TodoClient {
        self.harness.client()
    }

    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Create and track a task.
    ///
    /// The id is tracked as soon as the server returns one, so a task that
    /// fails the creation checks is still cleaned up.
    pub async fn create_task(&mut self, text: &str) -> ApiResult<Task> {
        let response = self.client().create(&json!({ "text": text })).await?;
        if let Some(id) = response
            .json()
            .ok()
            .as_ref()
            .and_then(|body| body.get("id"))
            .and_then(Value::as_str)
        {
            self.created.push(id.to_string());
        }
        check_created(&response, text)
    }

    /// Delete every tracked task. All deletions are attempted; the first
    /// failure is returned.
    pub async fn cleanup(&mut self) -> ApiResult<()> {
        let mut first_err = None;
        for id in std::mem::take(&mut self.created) {
            if let Err(e) = self.harness.delete_task(&id).await {
                warn!("Failed to delete task {}: {}", id, e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
