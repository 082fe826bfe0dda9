//! ToDo Tasks API scenarios
//!
//! Each scenario creates the tasks it needs through [`Fixtures`] and leaves
//! their deletion to the runner.

use serde_json::json;
use uuid::Uuid;

use journeycheck_common::expect::{expect_contains, expect_eq, expect_true};
use journeycheck_common::Error;

use crate::error::ApiResult;
use crate::fixtures::Fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiScenario {
    ListIncludesCreated,
    Create,
    CreateWithoutText,
    UpdateText,
    UpdateUnknownId,
    Complete,
    ListCompleted,
    Incomplete,
    Delete,
    DeleteUnknownId,
    ToggleUnknownId,
}

impl ApiScenario {
    pub const ALL: [ApiScenario; 11] = [
        ApiScenario::ListIncludesCreated,
        ApiScenario::Create,
        ApiScenario::CreateWithoutText,
        ApiScenario::UpdateText,
        ApiScenario::UpdateUnknownId,
        ApiScenario::Complete,
        ApiScenario::ListCompleted,
        ApiScenario::Incomplete,
        ApiScenario::Delete,
        ApiScenario::DeleteUnknownId,
        ApiScenario::ToggleUnknownId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ApiScenario::ListIncludesCreated => {
                "GET /tasks → should return an array of existing tasks including newly created ones"
            }
            ApiScenario::Create => "POST /tasks → should create a new task",
            ApiScenario::CreateWithoutText => "POST /tasks → should fail when 'text' field is missing",
            ApiScenario::UpdateText => "POST /tasks/:id → should update task text",
            ApiScenario::UpdateUnknownId => "POST /tasks/:id → should return 404 for non-existent ID",
            ApiScenario::Complete => "POST /tasks/:id/complete → should mark a task as completed",
            ApiScenario::ListCompleted => "GET /tasks/completed → should return only completed tasks",
            ApiScenario::Incomplete => "POST /tasks/:id/incomplete → should mark a task as incomplete",
            ApiScenario::Delete => "DELETE /tasks/:id → should delete an existing task",
            ApiScenario::DeleteUnknownId => "DELETE /tasks/:id → should return 404 if task does not exist",
            ApiScenario::ToggleUnknownId => {
                "POST /tasks/:id/complete|incomplete → should return 404 for non-existent ID"
            }
        }
    }

    pub async fn run(self, fx: &mut Fixtures) -> ApiResult<()> {
        match self {
            ApiScenario::ListIncludesCreated => list_includes_created(fx).await,
            ApiScenario::Create => create(fx).await,
            ApiScenario::CreateWithoutText => create_without_text(fx).await,
            ApiScenario::UpdateText => update_text(fx).await,
            ApiScenario::UpdateUnknownId => update_unknown_id(fx).await,
            ApiScenario::Complete => complete(fx).await,
            ApiScenario::ListCompleted => list_completed(fx).await,
            ApiScenario::Incomplete => incomplete(fx).await,
            ApiScenario::Delete => delete(fx).await,
            ApiScenario::DeleteUnknownId => delete_unknown_id(fx).await,
            ApiScenario::ToggleUnknownId => toggle_unknown_id(fx).await,
        }
    }
}

fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4())
}

async fn list_includes_created(fx: &mut Fixtures) -> ApiResult<()> {
    let mut created = Vec::new();
    for prefix in ["GetTaskTest-1-", "GetTaskTest-2-"] {
        created.push(fx.create_task(&unique(prefix)).await?);
    }

    let response = fx.client().list_tasks().await?;
    response.expect_status(200)?;
    let tasks = response.tasks()?;
    expect_true("task list holds the created tasks", tasks.len() >= created.len())?;

    for task in &created {
        let found = tasks.iter().find(|t| t.id == task.id);
        expect_true(&format!("task {} listed", task.id), found.is_some())?;
        if let Some(found) = found {
            expect_eq("listed task text", task.text.as_str(), found.text.as_str())?;
            expect_eq("listed task completed", &false, &found.completed)?;
            expect_true("listed task has no completedDate", found.completed_date.is_none())?;
        }
    }
    Ok(())
}

async fn create(fx: &mut Fixtures) -> ApiResult<()> {
    let text = unique("New Task - ");
    let task = fx.create_task(&text).await?;

    expect_eq("task text", text.as_str(), task.text.as_str())?;
    expect_eq("task completed", &false, &task.completed)?;
    Ok(())
}

async fn create_without_text(fx: &mut Fixtures) -> ApiResult<()> {
    let response = fx.client().create(&json!({})).await?;
    response.expect_status(422)?;
    expect_contains("422 response body", &response.body, "'text' field must be present")?;
    Ok(())
}

async fn update_text(fx: &mut Fixtures) -> ApiResult<()> {
    let initial = fx.create_task(&unique("Initial Task - ")).await?;
    let updated_text = unique("Updated Task - ");

    let response = fx
        .client()
        .update(&initial.id, &json!({ "text": updated_text }))
        .await?;
    response.expect_status(200)?;
    let updated = response.task()?;

    expect_eq("updated task id", initial.id.as_str(), updated.id.as_str())?;
    expect_eq("updated task text", updated_text.as_str(), updated.text.as_str())?;
    expect_eq("updated task completed", &initial.completed, &updated.completed)?;
    expect_eq("updated task createdDate", &initial.created_date, &updated.created_date)?;
    expect_true("updated task has no completedDate", updated.completed_date.is_none())?;
    Ok(())
}

async fn update_unknown_id(fx: &mut Fixtures) -> ApiResult<()> {
    let id = unique("invalid-id-");
    let response = fx
        .client()
        .update(&id, &json!({ "text": "irrelevant" }))
        .await?;
    response.expect_status(404)
}

async fn complete(fx: &mut Fixtures) -> ApiResult<()> {
    let task = fx.create_task(&unique("Task to Complete - ")).await?;

    let response = fx.client().complete(&task.id).await?;
    response.expect_status(200)?;
    let completed = response.task()?;

    expect_eq("completed task completed", &true, &completed.completed)?;
    let completed_date = completed.completed_date.ok_or_else(|| {
        Error::assertion("completed task completedDate", "a numeric timestamp", "<absent>")
    })?;
    expect_true(
        "completedDate not before createdDate",
        completed_date >= completed.created_date,
    )?;
    Ok(())
}

async fn list_completed(fx: &mut Fixtures) -> ApiResult<()> {
    let task = fx.create_task(&unique("Completed Task - ")).await?;
    fx.client().complete(&task.id).await?.expect_status(200)?;

    let response = fx.client().list_completed().await?;
    response.expect_status(200)?;
    let tasks = response.tasks()?;

    for listed in &tasks {
        expect_true(&format!("task {} completed", listed.id), listed.completed)?;
        expect_true(
            &format!("task {} has completedDate", listed.id),
            listed.completed_date.is_some(),
        )?;
    }
    expect_true(
        "completed list holds the completed task",
        tasks.iter().any(|t| t.id == task.id),
    )?;
    Ok(())
}

async fn incomplete(fx: &mut Fixtures) -> ApiResult<()> {
    let task = fx.create_task(&unique("Task to Toggle - ")).await?;
    fx.client().complete(&task.id).await?.expect_status(200)?;

    let response = fx.client().incomplete(&task.id).await?;
    response.expect_status(200)?;
    let toggled = response.task()?;

    expect_eq("toggled task completed", &false, &toggled.completed)?;
    expect_true("toggled task has no completedDate", toggled.completed_date.is_none())?;
    expect_eq("toggled task id", task.id.as_str(), toggled.id.as_str())?;
    expect_eq("toggled task text", task.text.as_str(), toggled.text.as_str())?;
    expect_eq("toggled task createdDate", &task.created_date, &toggled.created_date)?;
    Ok(())
}

async fn delete(fx: &mut Fixtures) -> ApiResult<()> {
    let task = fx.create_task(&unique("Task to Delete - ")).await?;

    fx.client().delete(&task.id).await?.expect_status(200)?;
    fx.client().delete(&task.id).await?.expect_status(404)
}

async fn delete_unknown_id(fx: &mut Fixtures) -> ApiResult<()> {
    let id = unique("nonexistent-id-");
    fx.client().delete(&id).await?.expect_status(404)
}

async fn toggle_unknown_id(fx: &mut Fixtures) -> ApiResult<()> {
    let id = unique("unknown-id-");
    fx.client().complete(&id).await?.expect_status(404)?;
    fx.client().incomplete(&id).await?.expect_status(404)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_names_are_unique() {
        let names: HashSet<_> = ApiScenario::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), ApiScenario::ALL.len());
    }

    #[test]
    fn unique_texts_differ() {
        let a = unique("New Task - ");
        let b = unique("New Task - ");
        assert!(a.starts_with("New Task - "));
        assert_ne!(a, b);
    }
}
