//! Mock deal sender for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::DealConfig;
use crate::distribution::{DealProposal, DealSender, DistributionError};
use crate::manifest::FileDescriptor;

/// A recorded `send_deals` call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedDeals {
    pub task_name: String,
    pub output_dir: PathBuf,
    /// Per-GiB price the sender was asked to use.
    pub max_price: Option<String>,
    pub verified_deal: bool,
    pub fast_retrieval: bool,
    /// Descriptors as they were when the call was made.
    pub file_descs: Vec<FileDescriptor>,
    pub success: bool,
}

/// Mock implementation of the DealSender trait.
///
/// Records every call, assigns `bafydeal<n>` deal CIDs on success and can be
/// told to fail the next call.
#[derive(Debug, Clone, Default)]
pub struct MockDealSender {
    calls: Arc<RwLock<Vec<RecordedDeals>>>,
    next_error: Arc<RwLock<Option<DistributionError>>>,
}

impl MockDealSender {
    /// Create a new mock deal sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedDeals> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls made.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: DistributionError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl DealSender for MockDealSender {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_deals(
        &self,
        config: &DealConfig,
        task_name: &str,
        output_dir: &Path,
        file_descs: &mut [FileDescriptor],
    ) -> Result<Vec<DealProposal>, DistributionError> {
        let mut record = RecordedDeals {
            task_name: task_name.to_string(),
            output_dir: output_dir.to_path_buf(),
            max_price: config.max_price.clone(),
            verified_deal: config.verified_deal,
            fast_retrieval: config.fast_retrieval,
            file_descs: file_descs.to_vec(),
            success: false,
        };

        if let Some(error) = self.next_error.write().await.take() {
            self.calls.write().await.push(record);
            return Err(error);
        }

        let proposals = file_descs
            .iter_mut()
            .enumerate()
            .map(|(idx, desc)| {
                let deal_cid = format!("bafydeal{}", idx);
                desc.deal_cid = Some(deal_cid.clone());
                DealProposal {
                    car_file_name: desc.car_file_name.clone(),
                    miner_fid: desc.miner_fid.clone().unwrap_or_default(),
                    deal_cid,
                    start_epoch: desc.start_epoch.unwrap_or_default(),
                }
            })
            .collect();

        record.success = true;
        self.calls.write().await.push(record);
        Ok(proposals)
    }
}
