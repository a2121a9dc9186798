use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use super::types::{Task, TaskType};
use super::validator::ValidatedTask;
use crate::config::{StorageServerType, TaskConfig};
use crate::manifest::FileDescriptor;

/// Builds the task manifest with a freshly generated UUID.
pub fn build_task(config: &TaskConfig, validated: &ValidatedTask) -> Task {
    let task_type = if config.verified_deal {
        TaskType::Verified
    } else {
        TaskType::Regular
    };

    Task {
        task_name: validated.task_name.clone(),
        fast_retrieval: config.fast_retrieval,
        task_type,
        is_public: u8::from(config.public_deal),
        max_price: validated.max_price,
        bid_mode: config.bid_mode,
        expire_days: config.expire_days,
        miner_fid: config.miner_fid.clone().filter(|m| !m.is_empty()),
        uuid: Uuid::new_v4().to_string(),
        curated_dataset: config.dataset.clone(),
        description: config.description.clone(),
    }
}

/// Stamps task identity, provider, start epoch and (for web servers) the
/// download URL onto every descriptor.
pub fn stamp_file_descs(descs: &mut [FileDescriptor], task: &Task, config: &TaskConfig) {
    let web_server = config.storage_server_type == StorageServerType::WebServer;

    for desc in descs.iter_mut() {
        desc.uuid = Some(task.uuid.clone());
        desc.miner_fid = task.miner_fid.clone();
        desc.start_epoch = Some(config.start_epoch);

        if web_server {
            let url = url_join(
                &config.web_server_download_url_prefix,
                base_name(&desc.car_file_name),
            );
            desc.car_file_url = Some(url);
        }
    }

    debug!(
        uuid = %task.uuid,
        files = descs.len(),
        "Stamped CAR file descriptors"
    );
}

/// Joins a URL prefix and a path segment with exactly one slash.
pub fn url_join(prefix: &str, segment: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');

    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", prefix, segment)
    }
}

fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name)
}
