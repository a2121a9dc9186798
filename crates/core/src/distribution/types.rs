//! Types for deal distribution.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DealConfig;
use crate::manifest::FileDescriptor;

/// Errors that can occur while sending deals.
#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Missing {field} for {car_file_name}")]
    MissingField {
        field: &'static str,
        car_file_name: String,
    },

    #[error("Invalid deal price: {0}")]
    InvalidPrice(String),

    #[error("Failed to write deal manifest: {0}")]
    Io(#[from] std::io::Error),
}

/// A deal proposed for one CAR file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealProposal {
    pub car_file_name: String,
    pub miner_fid: String,
    pub deal_cid: String,
    pub start_epoch: i64,
}

/// Sends storage deals for a batch of CAR files.
#[async_trait]
pub trait DealSender: Send + Sync {
    /// Returns the name of this sender implementation.
    fn name(&self) -> &str;

    /// Proposes one deal per descriptor to its assigned storage provider.
    ///
    /// Implementations may record the resulting deal CID on each descriptor
    /// and write their own records under `output_dir`.
    async fn send_deals(
        &self,
        config: &DealConfig,
        task_name: &str,
        output_dir: &Path,
        file_descs: &mut [FileDescriptor],
    ) -> Result<Vec<DealProposal>, DistributionError>;
}
