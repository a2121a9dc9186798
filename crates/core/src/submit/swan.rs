//! Swan HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::json;
use tokio::fs;
use tracing::debug;

use crate::config::SwanApiConfig;
use crate::task::Task;

use super::{SubmitError, SwanConnector, SwanResponse, TaskSubmitter};

/// Authenticated Swan API session.
pub struct SwanClient {
    client: Client,
    api_url: String,
    jwt: String,
}

impl SwanClient {
    /// Exchange the API key and access token for a JWT.
    pub async fn connect(config: &SwanApiConfig) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SubmitError::ConnectionFailed(e.to_string()))?;

        let api_url = config.api_url.trim_end_matches('/').to_string();
        let url = format!("{}/user/api_keys/jwt", api_url);

        let response = client
            .post(&url)
            .json(&json!({
                "apikey": config.api_key,
                "access_token": config.access_token,
            }))
            .send()
            .await
            .map_err(SubmitError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let login: LoginResponse = serde_json::from_str(&body).map_err(|_| {
            SubmitError::AuthenticationFailed(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            ))
        })?;

        match login.data.map(|d| d.jwt) {
            Some(jwt) if login.status == super::SUCCESS_STATUS && !jwt.is_empty() => {
                debug!("Swan login successful");
                Ok(Self {
                    client,
                    api_url,
                    jwt,
                })
            }
            _ => Err(SubmitError::AuthenticationFailed(format!(
                "status: {}, message: {}",
                login.status, login.message
            ))),
        }
    }

    fn task_form(task: &Task) -> multipart::Form {
        multipart::Form::new()
            .text("task_name", task.task_name.clone())
            .text(
                "curated_dataset",
                task.curated_dataset.clone().unwrap_or_default(),
            )
            .text("description", task.description.clone().unwrap_or_default())
            .text("is_public", task.is_public.to_string())
            .text("type", task.task_type.as_str())
            .text("miner_fid", task.miner_fid.clone().unwrap_or_default())
            .text("fast_retrieval", task.fast_retrieval.to_string())
            .text("bid_mode", task.bid_mode.code().to_string())
            .text("max_price", task.max_price.to_string())
            .text("expire_days", task.expire_days.to_string())
            .text("uuid", task.uuid.clone())
    }
}

#[async_trait]
impl TaskSubmitter for SwanClient {
    async fn create_task(&self, task: &Task, csv_path: &Path) -> Result<SwanResponse, SubmitError> {
        let data = fs::read(csv_path).await?;
        let file_name = csv_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("{}.csv", task.task_name));

        let file_part = multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(|e| SubmitError::ApiError(e.to_string()))?;
        let form = Self::task_form(task).part("file", file_part);

        let url = format!("{}/tasks", self.api_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(SubmitError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Swan reports application failures in the body, sometimes with a
        // non-2xx code; only an unparsable body is a transport failure.
        serde_json::from_str::<SwanResponse>(&body).map_err(|_| {
            SubmitError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

/// Connector producing real `SwanClient` sessions.
#[derive(Debug, Default, Clone)]
pub struct SwanHttpConnector;

#[async_trait]
impl SwanConnector for SwanHttpConnector {
    fn name(&self) -> &str {
        "swan-http"
    }

    async fn connect(&self, config: &SwanApiConfig) -> Result<Box<dyn TaskSubmitter>, SubmitError> {
        Ok(Box::new(SwanClient::connect(config).await?))
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    jwt: String,
}
