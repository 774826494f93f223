//! Todoist HTTP client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

use tasklog_core::{CompletedTask, DayWindow, Error, Project, Result, RetryPolicy, TaskSource};

use crate::wire::{CompletedResponse, WireProject};

/// Todoist REST API root.
pub const DEFAULT_REST_BASE_URL: &str = "https://api.todoist.com/rest/v2";

/// Todoist sync API root, home of `completed/get_all`.
pub const DEFAULT_SYNC_BASE_URL: &str = "https://api.todoist.com/sync/v9";

/// Maximum number of completed tasks requested per day.
pub const DEFAULT_TASK_LIMIT: u32 = 100;

const SERVICE: &str = "todoist";

/// TodoistClientBuilder implements the builder pattern for building a
/// [`TodoistClient`]. Only the API token is required.
#[derive(Clone)]
pub struct TodoistClientBuilder {
    api_token: String,
    rest_base_url: String,
    sync_base_url: String,
    task_limit: u32,
    retry: RetryPolicy,
    timeout: Duration,
}

impl TodoistClientBuilder {
    /// Create a new builder for the given API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            sync_base_url: DEFAULT_SYNC_BASE_URL.to_string(),
            task_limit: DEFAULT_TASK_LIMIT,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the REST API root (no trailing slash).
    pub fn rest_base_url(mut self, url: impl Into<String>) -> Self {
        self.rest_base_url = url.into();
        self
    }

    /// Override the sync API root (no trailing slash).
    pub fn sync_base_url(mut self, url: impl Into<String>) -> Self {
        self.sync_base_url = url.into();
        self
    }

    /// Set the maximum number of tasks fetched per day.
    pub fn task_limit(mut self, limit: u32) -> Self {
        self.task_limit = limit;
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the timeout for each HTTP request. The default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client, consuming the builder.
    pub fn build(self) -> Result<TodoistClient> {
        if self.api_token.trim().is_empty() {
            return Err(Error::config("Todoist API token is empty"));
        }
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::http_with_source("cannot build HTTP client", e))?;
        Ok(TodoistClient {
            http,
            api_token: self.api_token,
            rest_base_url: self.rest_base_url.trim_end_matches('/').to_string(),
            sync_base_url: self.sync_base_url.trim_end_matches('/').to_string(),
            task_limit: self.task_limit,
            retry: self.retry,
        })
    }
}

/// Client for the parts of the Todoist API tasklog needs.
#[derive(Clone)]
pub struct TodoistClient {
    http: reqwest::Client,
    api_token: String,
    rest_base_url: String,
    sync_base_url: String,
    task_limit: u32,
    retry: RetryPolicy,
}

impl TodoistClient {
    /// Start building a client for `api_token`.
    pub fn builder(api_token: impl Into<String>) -> TodoistClientBuilder {
        TodoistClientBuilder::new(api_token)
    }

    /// All projects visible to the token.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        let url = format!("{}/projects", self.rest_base_url);
        let projects: Vec<WireProject> = self
            .retry
            .run("todoist.projects", || self.get_json(&url, &[]))
            .await?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    /// Tasks completed in `project_id` during `window`.
    pub async fn completed_in(
        &self,
        window: &DayWindow,
        project_id: &str,
    ) -> Result<Vec<CompletedTask>> {
        let url = format!("{}/completed/get_all", self.sync_base_url);
        let query = [
            ("since", window.start_iso()),
            ("until", window.end_iso()),
            ("limit", self.task_limit.to_string()),
            ("project_id", project_id.to_string()),
        ];
        let response: CompletedResponse = self
            .retry
            .run("todoist.completed", || self.get_json(&url, &query))
            .await?;

        let tasks: Vec<CompletedTask> = response
            .items
            .into_iter()
            .map(CompletedTask::from)
            .collect();
        tracing::debug!(
            date = %window,
            project_id,
            count = tasks.len(),
            "Fetched completed tasks"
        );
        if tasks.len() >= self.task_limit as usize {
            tracing::warn!(
                date = %window,
                limit = self.task_limit,
                "Completed task count reached the request limit; some tasks may be missing"
            );
        }
        Ok(tasks)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_token)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(SERVICE, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::decode(format!("{SERVICE} response from {url}: {e}")))
    }
}

impl fmt::Debug for TodoistClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoistClient")
            .field("rest_base_url", &self.rest_base_url)
            .field("sync_base_url", &self.sync_base_url)
            .field("task_limit", &self.task_limit)
            .finish_non_exhaustive()
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    Error::http_with_source(format!("{SERVICE} request failed"), err)
}

#[async_trait]
impl TaskSource for TodoistClient {
    async fn resolve_project(&self, name: &str) -> Result<String> {
        self.projects()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .ok_or_else(|| Error::ProjectNotFound {
                name: name.to_string(),
            })
    }

    async fn completed_tasks(
        &self,
        window: &DayWindow,
        project_id: &str,
    ) -> Result<Vec<CompletedTask>> {
        self.completed_in(window, project_id).await
    }
}
