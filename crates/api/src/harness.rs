//! Task helpers shared by the API scenarios

use serde_json::json;
use tracing::debug;

use journeycheck_common::expect::{expect_eq, expect_status_in, expect_true};
use journeycheck_common::Task;

use crate::client::{ApiResponse, TodoClient};
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct TaskHarness {
    client: TodoClient,
}

impl TaskHarness {
    pub fn new(client: TodoClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// Create a task and check the server's answer describes a fresh, active task
    pub async fn create_task(&self, text: &str) -> ApiResult<Task> {
        let response = self.client.create(&json!({ "text": text })).await?;
        check_created(&response, text)
    }

    /// Delete a task; an already missing task is fine
    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        let response = self.client.delete(id).await?;
        expect_status_in(&response.request, &[200, 404], response.status)?;
        debug!("Deleted task {} ({})", id, response.status);
        Ok(())
    }
}

/// Validate a `POST /tasks` response for `text`
pub fn check_created(response: &ApiResponse, text: &str) -> ApiResult<Task> {
    response.expect_status(200)?;
    let task = response.task()?;

    expect_eq("created task text", text, task.text.as_str())?;
    expect_eq("created task completed", &false, &task.completed)?;
    expect_true("created task has no completedDate", task.completed_date.is_none())?;

    debug!("Created task {}", task.id);
    Ok(task)
}
