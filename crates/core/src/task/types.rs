use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::BidMode;

/// Deal type requested for the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Regular,
    Verified,
}

impl TaskType {
    /// Returns the string representation used by the Swan API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Regular => "regular",
            TaskType::Verified => "verified",
        }
    }
}

/// The task manifest submitted to Swan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_name: String,
    pub fast_retrieval: bool,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// 1 for public tasks, 0 for private ones
    pub is_public: u8,
    pub max_price: Decimal,
    pub bid_mode: BidMode,
    pub expire_days: u32,
    pub miner_fid: Option<String>,
    pub uuid: String,
    pub curated_dataset: Option<String>,
    pub description: Option<String>,
}

impl Task {
    pub fn is_public(&self) -> bool {
        self.is_public == 1
    }
}
