//! HTTP solver client
//!
//! JSON over HTTP against the optimizer backend. Every request carries the
//! configured timeout; an elapsed timeout is reported as
//! [`SyncError::Timeout`] rather than a generic network failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shiftboard_core::{OptimizationResult, ShiftTemplate, Skill, Worker};
use tracing::{debug, warn};

use crate::api::{RemoveAssignmentRequest, SolverApi};
use crate::error::SyncError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const OPTIMIZE_PATH: &str = "assignments/optimize";
const REMOVE_PATH: &str = "assignments/optimize/remove";

/// reqwest-backed [`SolverApi`]
#[derive(Clone, Debug)]
pub struct HttpSolverClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSolverClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SyncError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Network(e.to_string()))?;

        Ok(Self::from_client(client, base_url, timeout))
    }

    /// Wrap a preconfigured client (proxy, TLS); `timeout` should match its own
    pub fn from_client(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn transport_error(&self, err: &reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout(self.timeout)
        } else {
            SyncError::Network(err.to_string())
        }
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<String, SyncError> {
        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "request failed");
            self.transport_error(&e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(&e))?;
        debug!(path, status = status.as_u16(), bytes = body.len(), "response");

        if !status.is_success() {
            warn!(path, status = status.as_u16(), "server error");
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, SyncError> {
        serde_json::from_str(body).map_err(|e| SyncError::MalformedResponse(e.to_string()))
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SyncError> {
        debug!(path, "GET");
        let body = self.send(self.client.get(self.url(path)), path).await?;
        Self::decode(&body)
    }

    pub async fn workers(&self) -> Result<Vec<Worker>, SyncError> {
        self.get_json("workers").await
    }

    pub async fn skills(&self) -> Result<Vec<Skill>, SyncError> {
        self.get_json("skills").await
    }

    pub async fn shifts(&self) -> Result<Vec<ShiftTemplate>, SyncError> {
        self.get_json("shifts").await
    }

    /// Task catalogue, passed through untyped
    pub async fn tasks(&self) -> Result<Vec<serde_json::Value>, SyncError> {
        self.get_json("tasks").await
    }

    /// Persisted assignments, passed through untyped
    pub async fn assignments(&self) -> Result<Vec<serde_json::Value>, SyncError> {
        self.get_json("assignments").await
    }
}

#[async_trait]
impl SolverApi for HttpSolverClient {
    async fn fetch_current(&self) -> Result<OptimizationResult, SyncError> {
        self.get_json(OPTIMIZE_PATH).await
    }

    async fn re_optimize(&self) -> Result<OptimizationResult, SyncError> {
        debug!(path = OPTIMIZE_PATH, "POST");
        let body = self
            .send(self.client.post(self.url(OPTIMIZE_PATH)), OPTIMIZE_PATH)
            .await?;
        Self::decode(&body)
    }

    async fn remove_assignment(&self, request: &RemoveAssignmentRequest) -> Result<(), SyncError> {
        debug!(path = REMOVE_PATH, assignment_id = request.assignment_id, "POST");
        self.send(self.client.post(self.url(REMOVE_PATH)).json(request), REMOVE_PATH)
            .await
            .map(|_| ())
    }
}
