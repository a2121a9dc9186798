//! Mock Swan connector for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::SwanApiConfig;
use crate::submit::{SubmitError, SwanConnector, SwanResponse, TaskSubmitter};
use crate::task::Task;

/// A task received by the mock session.
#[derive(Debug, Clone)]
pub struct SubmittedTask {
    pub task: Task,
    pub csv_path: PathBuf,
    /// CSV content at submission time.
    pub csv_content: String,
}

#[derive(Debug, Default)]
struct MockSwanState {
    connects: usize,
    submitted: Vec<SubmittedTask>,
    response: Option<SwanResponse>,
    connect_error: Option<SubmitError>,
    submit_error: Option<SubmitError>,
}

/// Mock implementation of the SwanConnector trait.
///
/// Sessions answer `{status: "success", message: "ok"}` unless another
/// response or an error is configured.
#[derive(Debug, Clone, Default)]
pub struct MockSwanConnector {
    state: Arc<RwLock<MockSwanState>>,
}

impl MockSwanConnector {
    /// Create a new mock connector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions opened.
    pub async fn connect_count(&self) -> usize {
        self.state.read().await.connects
    }

    /// Tasks received by sessions, in order.
    pub async fn submitted_tasks(&self) -> Vec<SubmittedTask> {
        self.state.read().await.submitted.clone()
    }

    /// Response returned by subsequent submissions.
    pub async fn set_response(&self, response: SwanResponse) {
        self.state.write().await.response = Some(response);
    }

    /// Configure the next connect to fail.
    pub async fn set_connect_error(&self, error: SubmitError) {
        self.state.write().await.connect_error = Some(error);
    }

    /// Configure the next submission to fail.
    pub async fn set_submit_error(&self, error: SubmitError) {
        self.state.write().await.submit_error = Some(error);
    }
}

#[async_trait]
impl SwanConnector for MockSwanConnector {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self, _config: &SwanApiConfig) -> Result<Box<dyn TaskSubmitter>, SubmitError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.connect_error.take() {
            return Err(error);
        }
        state.connects += 1;

        Ok(Box::new(MockSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockSession {
    state: Arc<RwLock<MockSwanState>>,
}

#[async_trait]
impl TaskSubmitter for MockSession {
    async fn create_task(&self, task: &Task, csv_path: &Path) -> Result<SwanResponse, SubmitError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.submit_error.take() {
            return Err(error);
        }

        let csv_content = tokio::fs::read_to_string(csv_path).await?;
        state.submitted.push(SubmittedTask {
            task: task.clone(),
            csv_path: csv_path.to_path_buf(),
            csv_content,
        });

        Ok(state.response.clone().unwrap_or_else(|| SwanResponse {
            status: "success".to_string(),
            message: "ok".to_string(),
        }))
    }
}
