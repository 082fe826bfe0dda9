//! In-process fake of the ToDo Tasks API
//!
//! Serves the same routes as the real service on an ephemeral port. A few
//! switches make it misbehave so failure paths can be exercised.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use journeycheck_api::{TaskHarness, TodoClient};
use journeycheck_common::Task;

/// Ways the fake deviates from the contract
#[derive(Debug, Default, Clone)]
pub struct Faults {
    /// `incomplete` leaves `completedDate` in place
    pub keep_completed_date_on_incomplete: bool,
    /// Status for `POST /tasks` without text, instead of 422
    pub missing_text_status: Option<u16>,
    /// `DELETE` answers 500 without deleting
    pub fail_deletes: bool,
    /// `POST /tasks` creates the task already completed
    pub create_completed: bool,
    /// `POST /tasks` stamps a `completedDate` on the new task
    pub create_with_completed_date: bool,
    /// `POST /tasks` appends this to the stored text
    pub create_text_suffix: Option<String>,
    /// `POST /tasks/:id` also marks the task completed and rewrites its dates
    pub clobber_on_update: bool,
    /// `complete` stamps a `completedDate` before `createdDate`
    pub complete_before_created: bool,
    /// `GET /tasks/completed` lists active tasks too
    pub list_active_as_completed: bool,
    /// `incomplete` resets `createdDate`
    pub reset_created_date_on_incomplete: bool,
}

#[derive(Default)]
struct FakeState {
    tasks: BTreeMap<String, Task>,
    faults: Faults,
}

type SharedState = Arc<RwLock<FakeState>>;

pub struct FakeTaskApi {
    pub base_url: String,
    state: SharedState,
}

impl FakeTaskApi {
    pub async fn start() -> Self {
        Self::start_with(Faults::default()).await
    }

    pub async fn start_with(faults: Faults) -> Self {
        let state: SharedState = Arc::new(RwLock::new(FakeState {
            tasks: BTreeMap::new(),
            faults,
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn harness(&self) -> TaskHarness {
        TaskHarness::new(TodoClient::new(&self.base_url).unwrap())
    }

    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    /// Insert a task directly, bypassing the API
    pub async fn seed(&self, text: &str, completed: bool) -> Task {
        let now = chrono::Utc::now().timestamp_millis();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed,
            created_date: now,
            completed_date: completed.then_some(now),
        };
        self.state
            .write()
            .await
            .tasks
            .insert(task.id.clone(), task.clone());
        task
    }

    pub async fn set_faults(&self, faults: Faults) {
        self.state.write().await.faults = faults;
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/completed", get(list_completed))
        .route("/tasks/:id", post(update_task).delete(delete_task))
        .route("/tasks/:id/complete", post(complete_task))
        .route("/tasks/:id/incomplete", post(incomplete_task))
        .with_state(state)
}

fn not_found(id: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("Task with id '{}' not found", id)).into_response()
}

async fn list_tasks(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    Json(state.tasks.values().cloned().collect::<Vec<_>>())
}

async fn list_completed(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let everything = state.faults.list_active_as_completed;
    Json(
        state
            .tasks
            .values()
            .filter(|t| everything || t.completed)
            .cloned()
            .collect::<Vec<_>>(),
    )
}

async fn create_task(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.write().await;
    let text = match body.get("text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => {
            let status = state
                .faults
                .missing_text_status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
            return (status, Json(json!({ "message": "'text' field must be present" }))).into_response();
        }
    };

    let now = chrono::Utc::now().timestamp_millis();
    let faults = &state.faults;
    let task = Task {
        id: Uuid::new_v4().to_string(),
        text: match &faults.create_text_suffix {
            Some(suffix) => format!("{}{}", text, suffix),
            None => text,
        },
        completed: faults.create_completed,
        created_date: now,
        completed_date: faults.create_with_completed_date.then_some(now),
    };
    state.tasks.insert(task.id.clone(), task.clone());
    Json(task).into_response()
}

async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    let clobber = state.faults.clobber_on_update;
    let task = match state.tasks.get_mut(&id) {
        Some(task) => task,
        None => return not_found(&id),
    };
    if let Some(text) = body.get("text").and_then(Value::as_str) {
        task.text = text.to_string();
    }
    if clobber {
        task.completed = true;
        task.created_date = 1;
        task.completed_date = Some(5);
    }
    Json(task.clone()).into_response()
}

async fn complete_task(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;
    let backdate = state.faults.complete_before_created;
    let task = match state.tasks.get_mut(&id) {
        Some(task) => task,
        None => return not_found(&id),
    };
    task.completed = true;
    task.completed_date = Some(if backdate {
        task.created_date - 1000
    } else {
        chrono::Utc::now().timestamp_millis()
    });
    Json(task.clone()).into_response()
}

async fn incomplete_task(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;
    let keep_date = state.faults.keep_completed_date_on_incomplete;
    let reset_created = state.faults.reset_created_date_on_incomplete;
    let task = match state.tasks.get_mut(&id) {
        Some(task) => task,
        None => return not_found(&id),
    };
    task.completed = false;
    if !keep_date {
        task.completed_date = None;
    }
    if reset_created {
        task.created_date = chrono::Utc::now().timestamp_millis() + 1;
    }
    Json(task.clone()).into_response()
}

async fn delete_task(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;
    if state.faults.fail_deletes {
        return (StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable").into_response();
    }
    match state.tasks.remove(&id) {
        Some(_) => StatusCode::OK.into_response(),
        None => not_found(&id),
    }
}
