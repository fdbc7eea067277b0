//! HTTP client for the PlanCraft REST API.
//!
//! Every call is a single request/response round trip. Failures are returned
//! to the caller as [`ApiError`] and never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::board::TaskBackend;
use crate::config::is_http_url;
use crate::errors::ApiError;
use crate::models::{
    Created, DashboardStats, Member, NewProject, NewTask, NewTeam, NewUser, Project,
    RebalanceResult, StatusUpdate, Task, TaskStatus, Team,
};

/// Cookie-carrying client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !is_http_url(&base_url) {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(concat!("plancraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(
        &self,
        endpoint: String,
        builder: RequestBuilder,
    ) -> Result<(String, Response), ApiError> {
        debug!(%endpoint, "sending request");
        let resp = builder.send().await.map_err(|source| ApiError::Request {
            endpoint: endpoint.clone(),
            source,
        })?;

        let status = resp.status();
        if status.is_success() {
            debug!(%endpoint, status = status.as_u16(), "request succeeded");
            return Ok((endpoint, resp));
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason()),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: String,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let (endpoint, resp) = self.send(endpoint, builder).await?;
        resp.json::<T>()
            .await
            .map_err(|source| ApiError::Decode { endpoint, source })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let mut builder = self.request(Method::GET, path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.fetch(format!("GET {}", path), builder).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.fetch(format!("POST {}", path), builder).await
    }

    // Users

    /// Record the signed-in user server-side. Succeeds for new and existing users.
    pub async fn sync_user(&self, user: &NewUser) -> Result<Created, ApiError> {
        self.post("/api/users", user).await
    }

    // Teams

    pub async fn list_teams(&self, email: &str) -> Result<Vec<Team>, ApiError> {
        self.get("/api/teams", &[("email", email)]).await
    }

    pub async fn create_team(&self, team: &NewTeam) -> Result<Created, ApiError> {
        self.post("/api/teams", team).await
    }

    pub async fn add_member(&self, team_id: &str, member: &Member) -> Result<Created, ApiError> {
        self.post(&format!("/api/teams/{}/members", team_id), member)
            .await
    }

    // Projects

    pub async fn list_projects(&self, email: &str) -> Result<Vec<Project>, ApiError> {
        self.get("/api/projects", &[("email", email)]).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Created, ApiError> {
        self.post("/api/projects", project).await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project, ApiError> {
        self.get(&format!("/api/projects/{}", project_id), &[]).await
    }

    // Tasks

    pub async fn list_project_tasks(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        self.get(&format!("/api/tasks/project/{}", project_id), &[])
            .await
    }

    /// Project detail and its tasks, fetched concurrently.
    pub async fn project_with_tasks(&self, project_id: &str) -> Result<(Project, Vec<Task>), ApiError> {
        futures::try_join!(
            self.get_project(project_id),
            self.list_project_tasks(project_id)
        )
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Created, ApiError> {
        self.post("/api/tasks", task).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/tasks/{}", task_id);
        let builder = self.request(Method::DELETE, &path);
        self.send(format!("DELETE {}", path), builder).await?;
        Ok(())
    }

    // Dashboard

    pub async fn dashboard_stats(&self, email: &str) -> Result<DashboardStats, ApiError> {
        self.get("/api/dashboard/stats", &[("email", email)]).await
    }

    /// Teams and stats for the dashboard, fetched concurrently.
    pub async fn dashboard(&self, email: &str) -> Result<(DashboardStats, Vec<Team>), ApiError> {
        futures::try_join!(self.dashboard_stats(email), self.list_teams(email))
    }

    /// Ask the server to redistribute open tasks across the user's teams.
    pub async fn rebalance(&self, email: &str) -> Result<RebalanceResult, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }
        self.post("/api/dashboard/rebalance", &Body { email }).await
    }
}

#[async_trait]
impl TaskBackend for ApiClient {
    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> Result<(), ApiError> {
        let path = format!("/api/tasks/{}", task_id);
        let builder = self
            .request(Method::PUT, &path)
            .json(&StatusUpdate { status });
        self.send(format!("PUT {}", path), builder).await?;
        Ok(())
    }
}

/// Best human-readable message from an error body.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("request failed").to_string()
    } else {
        trimmed.to_string()
    }
}
