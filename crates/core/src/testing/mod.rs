//! Testing utilities and mock implementations of the task collaborators.
//!
//! # Example
//!
//! ```rust,ignore
//! use dealtask_core::testing::{MockDealSender, MockSwanConnector};
//!
//! let deal_sender = MockDealSender::new();
//! let connector = MockSwanConnector::new();
//!
//! let creator = TaskCreator::new(deal_sender.clone(), connector.clone());
//! let outcome = creator.create_task(&task_config, &deal_config).await?;
//!
//! assert_eq!(connector.submitted_tasks().await.len(), 1);
//! assert_eq!(deal_sender.call_count().await, 0);
//! ```

mod mock_deal_sender;
mod mock_swan;

pub use mock_deal_sender::{MockDealSender, RecordedDeals};
pub use mock_swan::{MockSwanConnector, SubmittedTask};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;

    use crate::config::{BidMode, StorageServerType, SwanApiConfig, TaskConfig};
    use crate::manifest::FileDescriptor;

    /// A public, online, auto-bid task configuration without a task name.
    pub fn task_config(input_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> TaskConfig {
        TaskConfig {
            task_name: None,
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            public_deal: true,
            verified_deal: true,
            fast_retrieval: true,
            bid_mode: BidMode::Auto,
            max_price: "0.00005".to_string(),
            expire_days: 4,
            start_epoch: 1_000_000,
            miner_fid: None,
            dataset: None,
            description: None,
            offline_mode: false,
            storage_server_type: StorageServerType::IpfsServer,
            web_server_download_url_prefix: String::new(),
            swan: SwanApiConfig {
                api_url: "http://swan.test".to_string(),
                api_key: "test-key".to_string(),
                access_token: "test-token".to_string(),
                timeout_secs: 5,
            },
        }
    }

    /// A CAR file descriptor as produced by the upload stage.
    pub fn file_desc(index: usize) -> FileDescriptor {
        FileDescriptor {
            car_file_name: format!("bafy{:04}.car", index),
            car_file_path: format!("/data/cars/bafy{:04}.car", index),
            car_file_size: 1024 * 1024 * (index as u64 + 1),
            car_file_md5: None,
            data_cid: format!("bafy{:04}", index),
            piece_cid: format!("baga{:04}", index),
            source_file_name: Some(format!("file{}.bin", index)),
            source_file_path: Some(format!("/data/src/file{}.bin", index)),
            source_file_size: Some(1000 * (index as u64 + 1)),
            ..Default::default()
        }
    }

    /// `count` upload-stage descriptors.
    pub fn file_descs(count: usize) -> Vec<FileDescriptor> {
        (0..count).map(file_desc).collect()
    }

    /// Writes `car.json` with `count` descriptors into `dir`.
    pub fn write_upload_manifest(dir: &Path, count: usize) -> Vec<FileDescriptor> {
        let descs = file_descs(count);
        let json = serde_json::to_vec_pretty(&descs).expect("serialize descriptors");
        std::fs::write(dir.join(crate::manifest::JSON_FILE_NAME_BY_UPLOAD), json)
            .expect("write car.json");
        descs
    }
}
