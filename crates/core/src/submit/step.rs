use std::path::PathBuf;

use tracing::{error, info};

use crate::config::TaskConfig;
use crate::error::TaskError;
use crate::manifest::{write_csv, FileDescriptor};
use crate::task::Task;

use super::SwanConnector;

/// How the submission step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Offline mode: the CSV snapshot is left for manual submission.
    Offline { csv_path: PathBuf },
    /// Swan accepted the task.
    Submitted {
        csv_path: PathBuf,
        status: String,
        message: String,
    },
}

impl SubmitOutcome {
    pub fn csv_path(&self) -> &PathBuf {
        match self {
            SubmitOutcome::Offline { csv_path } | SubmitOutcome::Submitted { csv_path, .. } => {
                csv_path
            }
        }
    }
}

/// Writes `<task name>.csv` and, in online mode, sends the task to Swan.
pub async fn submit_task(
    config: &TaskConfig,
    task: &Task,
    file_descs: &[FileDescriptor],
    connector: &dyn SwanConnector,
) -> Result<SubmitOutcome, TaskError> {
    let csv_file_name = format!("{}.csv", task.task_name);
    let csv_path = write_csv(file_descs, &config.output_dir, &csv_file_name).await?;

    if config.offline_mode {
        info!(
            csv = %csv_path.display(),
            "Working in offline mode, the task must be sent to Swan manually"
        );
        return Ok(SubmitOutcome::Offline { csv_path });
    }

    info!(
        api_url = %config.swan.api_url,
        connector = connector.name(),
        "Working in online mode, a Swan task will be created"
    );

    let session = connector.connect(&config.swan).await.map_err(|e| {
        error!(error = %e, connector = connector.name(), "Failed to connect to Swan");
        TaskError::Session(e)
    })?;

    let response = session.create_task(task, &csv_path).await.map_err(|e| {
        error!(error = %e, task = %task.task_name, "Failed to create Swan task");
        TaskError::Session(e)
    })?;

    if !response.is_success() {
        let err = TaskError::Rejected {
            status: response.status,
            message: response.message,
        };
        error!(error = %err, task = %task.task_name, "Swan rejected the task");
        return Err(err);
    }

    info!(
        status = %response.status,
        message = %response.message,
        uuid = %task.uuid,
        "Swan task created"
    );

    Ok(SubmitOutcome::Submitted {
        csv_path,
        status: response.status,
        message: response.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::SwanResponse;
    use crate::task::{build_task, validate_task_config};
    use crate::testing::{fixtures, MockSwanConnector};
    use tempfile::TempDir;

    fn setup(temp: &TempDir, offline: bool) -> (TaskConfig, Task, Vec<FileDescriptor>) {
        let mut config = fixtures::task_config(temp.path(), temp.path());
        config.task_name = Some("snapshot".to_string());
        config.offline_mode = offline;
        let validated = validate_task_config(&config).unwrap();
        let task = build_task(&config, &validated);
        (config, task, fixtures::file_descs(2))
    }

    #[tokio::test]
    async fn test_offline_writes_csv_without_connecting() {
        let temp = TempDir::new().unwrap();
        let (config, task, descs) = setup(&temp, true);
        let connector = MockSwanConnector::new();

        let outcome = submit_task(&config, &task, &descs, &connector)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Offline {
                csv_path: temp.path().join("snapshot.csv")
            }
        );
        assert!(temp.path().join("snapshot.csv").is_file());
        assert_eq!(connector.connect_count().await, 0);
    }

    #[tokio::test]
    async fn test_online_success() {
        let temp = TempDir::new().unwrap();
        let (config, task, descs) = setup(&temp, false);
        let connector = MockSwanConnector::new();

        let outcome = submit_task(&config, &task, &descs, &connector)
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
        let submitted = connector.submitted_tasks().await;
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].task.uuid, task.uuid);
        assert_eq!(submitted[0].csv_path, temp.path().join("snapshot.csv"));
    }

    #[tokio::test]
    async fn test_online_rejection_carries_status_and_message() {
        let temp = TempDir::new().unwrap();
        let (config, task, descs) = setup(&temp, false);
        let connector = MockSwanConnector::new();
        connector
            .set_response(SwanResponse {
                status: "fail".to_string(),
                message: "task name already exists".to_string(),
            })
            .await;

        let err = submit_task(&config, &task, &descs, &connector)
            .await
            .unwrap_err();

        let text = err.to_string();
        assert!(text.contains("fail"));
        assert!(text.contains("task name already exists"));
        assert!(matches!(err, TaskError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_connect_failure_is_session_error() {
        let temp = TempDir::new().unwrap();
        let (config, task, descs) = setup(&temp, false);
        let connector = MockSwanConnector::new();
        connector
            .set_connect_error(crate::submit::SubmitError::AuthenticationFailed(
                "bad key".to_string(),
            ))
            .await;

        let err = submit_task(&config, &task, &descs, &connector)
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Session(_)));
        // Snapshot is written before connecting
        assert!(temp.path().join("snapshot.csv").is_file());
        assert!(connector.submitted_tasks().await.is_empty());
    }
}
