//! ToDo Tasks API suite

use anyhow::{Context, Result};

use journeycheck_api::ApiRunner;
use journeycheck_common::{Settings, TestSuiteResult};

pub async fn execute(settings: &Settings) -> Result<TestSuiteResult> {
    let runner = ApiRunner::new(&settings.api.todo_tasks)
        .with_context(|| format!("creating client for {}", settings.api.todo_tasks))?;
    Ok(runner.run_all().await)
}
