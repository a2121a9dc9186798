//! Types for Swan submission.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SwanApiConfig;
use crate::task::Task;

/// Status string the Swan API uses for success.
pub const SUCCESS_STATUS: &str = "success";

/// Errors that can occur while talking to Swan.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to read task CSV: {0}")]
    Io(#[from] std::io::Error),
}

impl SubmitError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SubmitError::Timeout
        } else if e.is_connect() {
            SubmitError::ConnectionFailed(e.to_string())
        } else {
            SubmitError::ApiError(e.to_string())
        }
    }
}

/// Status/message pair returned by the Swan API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwanResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl SwanResponse {
    /// Only the literal `"success"` status counts as success.
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// An authenticated session that can create tasks.
#[async_trait]
pub trait TaskSubmitter: Send + Sync {
    /// Creates the task on Swan, attaching the CSV at `csv_path`.
    async fn create_task(&self, task: &Task, csv_path: &Path) -> Result<SwanResponse, SubmitError>;
}

/// Opens sessions against the Swan API.
#[async_trait]
pub trait SwanConnector: Send + Sync {
    /// Returns the name of this connector implementation.
    fn name(&self) -> &str;

    /// Authenticates with the configured credentials.
    async fn connect(&self, config: &SwanApiConfig) -> Result<Box<dyn TaskSubmitter>, SubmitError>;
}
