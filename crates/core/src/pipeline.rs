//! Task creation pipeline.
//!
//! Steps run strictly in order and the first failure ends the run:
//!
//! 1. validate the task configuration (no side effects)
//! 2. check the input directory, create the output directory
//! 3. read `car.json` from the input directory
//! 4. build the task and stamp every descriptor
//! 5. send deals (private tasks only)
//! 6. write `<task>-metadata.json` and `<task>-metadata.csv`
//! 7. write `<task>.csv` and submit to Swan unless offline
//!
//! Files written by a step are not removed when a later step fails.

use tracing::{error, info};

use crate::config::{DealConfig, TaskConfig};
use crate::distribution::DealSender;
use crate::error::TaskError;
use crate::manifest::{
    self, FileDescriptor, CSV_FILE_NAME_BY_TASK, JSON_FILE_NAME_BY_TASK, JSON_FILE_NAME_BY_UPLOAD,
};
use crate::submit::{submit_task, SubmitOutcome, SwanConnector};
use crate::task::{build_task, log_task_settings, stamp_file_descs, validate_task_config, Task};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    /// File name (not path) of the JSON manifest in the output directory.
    pub json_file_name: String,
    pub task: Task,
    pub file_descs: Vec<FileDescriptor>,
    pub submission: SubmitOutcome,
}

/// Creates storage deal tasks from upload-stage manifests.
pub struct TaskCreator<D: DealSender, C: SwanConnector> {
    deal_sender: D,
    connector: C,
}

impl<D: DealSender, C: SwanConnector> TaskCreator<D, C> {
    /// Creates a new task creator.
    pub fn new(deal_sender: D, connector: C) -> Self {
        Self {
            deal_sender,
            connector,
        }
    }

    /// Runs the pipeline once. Each call generates a new task UUID.
    pub async fn create_task(
        &self,
        config: &TaskConfig,
        deal_config: &DealConfig,
    ) -> Result<TaskOutcome, TaskError> {
        let validated = validate_task_config(config)
            .inspect_err(|e| error!(error = %e, "Invalid task configuration"))?;

        manifest::check_input_dir(&config.input_dir)
            .await
            .inspect_err(|e| error!(error = %e, "Input directory is not usable"))?;
        manifest::create_output_dir(&config.output_dir)
            .await
            .inspect_err(|e| error!(error = %e, "Output directory is not usable"))?;
        info!(output_dir = %config.output_dir.display(), "Output directory ready");

        log_task_settings(config);

        let mut file_descs =
            manifest::read_file_descs(&config.input_dir, JSON_FILE_NAME_BY_UPLOAD)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to read CAR files"))?;

        let task = build_task(config, &validated);
        stamp_file_descs(&mut file_descs, &task, config);
        info!(
            task = %task.task_name,
            uuid = %task.uuid,
            files = file_descs.len(),
            "Task assembled"
        );

        if !task.is_public() {
            let mut deal_config = deal_config.clone();
            deal_config
                .max_price
                .get_or_insert_with(|| config.max_price.clone());
            deal_config.verified_deal = config.verified_deal;
            deal_config.fast_retrieval = config.fast_retrieval;

            let proposals = self
                .deal_sender
                .send_deals(
                    &deal_config,
                    &task.task_name,
                    &config.output_dir,
                    &mut file_descs,
                )
                .await
                .inspect_err(|e| {
                    error!(error = %e, sender = self.deal_sender.name(), "Failed to send deals")
                })?;
            info!(deals = proposals.len(), "Deals sent to storage provider");
        }

        let json_file_name = format!("{}{}", task.task_name, JSON_FILE_NAME_BY_TASK);
        let csv_file_name = format!("{}{}", task.task_name, CSV_FILE_NAME_BY_TASK);
        manifest::write_file_descs(
            &file_descs,
            &config.output_dir,
            &json_file_name,
            &csv_file_name,
        )
        .await
        .inspect_err(|e| error!(error = %e, "Failed to write task manifests"))?;

        let submission = submit_task(config, &task, &file_descs, &self.connector)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to submit task"))?;

        Ok(TaskOutcome {
            json_file_name,
            task,
            file_descs,
            submission,
        })
    }
}
