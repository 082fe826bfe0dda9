//! HTTP client for the ToDo Tasks API

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use journeycheck_common::Task;

use crate::error::{ApiError, ApiResult};

/// Status and raw body of one API call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// `METHOD /path`, for error messages
    pub request: String,
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn expect_status(&self, expected: u16) -> ApiResult<()> {
        if self.status == expected {
            return Ok(());
        }
        Err(ApiError::UnexpectedStatus {
            request: self.request.clone(),
            expected,
            actual: self.status,
            body: self.body.clone(),
        })
    }

    pub fn json(&self) -> ApiResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::MalformedBody {
            request: self.request.clone(),
            reason: e.to_string(),
        })
    }

    /// Body as a single task, with strict field checks
    pub fn task(&self) -> ApiResult<Task> {
        Ok(Task::from_json(&self.json()?)?)
    }

    /// Body as an array of tasks
    pub fn tasks(&self) -> ApiResult<Vec<Task>> {
        Ok(Task::list_from_json(&self.json()?)?)
    }
}

/// Thin client over the Task endpoints. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct TodoClient {
    client: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<ApiResponse> {
        let request = format!("{} {}", method, path);
        let mut builder = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("{} -> {}", request, status);

        Ok(ApiResponse { request, status, body })
    }

    /// `GET /tasks`
    pub async fn list_tasks(&self) -> ApiResult<ApiResponse> {
        self.request(Method::GET, "/tasks", None).await
    }

    /// `GET /tasks/completed`
    pub async fn list_completed(&self) -> ApiResult<ApiResponse> {
        self.request(Method::GET, "/tasks/completed", None).await
    }

    /// `POST /tasks`
    pub async fn create(&self, body: &Value) -> ApiResult<ApiResponse> {
        self.request(Method::POST, "/tasks", Some(body)).await
    }

    /// `POST /tasks/:id`
    pub async fn update(&self, id: &str, body: &Value) -> ApiResult<ApiResponse> {
        self.request(Method::POST, &format!("/tasks/{}", id), Some(body))
            .await
    }

    /// `POST /tasks/:id/complete`
    pub async fn complete(&self, id: &str) -> ApiResult<ApiResponse> {
        self.request(Method::POST, &format!("/tasks/{}/complete", id), None)
            .await
    }

    /// `POST /tasks/:id/incomplete`
    pub async fn incomplete(&self, id: &str) -> ApiResult<ApiResponse> {
        self.request(Method::POST, &format!("/tasks/{}/incomplete", id), None)
            .await
    }

    /// `DELETE /tasks/:id`
    pub async fn delete(&self, id: &str) -> ApiResult<ApiResponse> {
        self.request(Method::DELETE, &format!("/tasks/{}", id), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            request: "GET /tasks".to_string(),
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = TodoClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn status_mismatch_keeps_body() {
        let err = response(422, "missing text").expect_status(200).unwrap_err();
        match err {
            ApiError::UnexpectedStatus { request, expected, actual, body } => {
                assert_eq!(request, "GET /tasks");
                assert_eq!(expected, 200);
                assert_eq!(actual, 422);
                assert_eq!(body, "missing text");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = response(200, "<html>").json().unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody { .. }));
    }

    #[test]
    fn task_body_is_checked() {
        let ok = response(200, r#"{"id":"a","text":"t","completed":false,"createdDate":1}"#);
        assert_eq!(ok.task().unwrap().id, "a");

        let bad = response(200, r#"{"id":"a","text":"t","completed":false,"createdDate":"today"}"#);
        assert!(matches!(bad.task().unwrap_err(), ApiError::Suite(_)));
    }
}
