use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub task: TaskConfig,
    #[serde(default)]
    pub deal: DealConfig,
}

/// Task creation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskConfig {
    /// Task name; `task_<timestamp>` is used when absent or empty
    #[serde(default)]
    pub task_name: Option<String>,
    /// Directory holding the upload stage's `car.json`
    pub input_dir: PathBuf,
    /// Directory receiving the task manifests
    pub output_dir: PathBuf,
    #[serde(default = "default_true")]
    pub public_deal: bool,
    #[serde(default = "default_true")]
    pub verified_deal: bool,
    #[serde(default = "default_true")]
    pub fast_retrieval: bool,
    #[serde(default)]
    pub bid_mode: BidMode,
    /// Maximum price per GiB per epoch, as a decimal string
    #[serde(default = "default_max_price")]
    pub max_price: String,
    #[serde(default = "default_expire_days")]
    pub expire_days: u32,
    #[serde(default)]
    pub start_epoch: i64,
    /// Assigned storage provider id (required for private tasks)
    #[serde(default)]
    pub miner_fid: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub offline_mode: bool,
    #[serde(default)]
    pub storage_server_type: StorageServerType,
    #[serde(default)]
    pub web_server_download_url_prefix: String,
    #[serde(default)]
    pub swan: SwanApiConfig,
}

fn default_true() -> bool {
    true
}

fn default_max_price() -> String {
    "0".to_string()
}

fn default_expire_days() -> u32 {
    4
}

/// How storage providers are chosen for the task
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BidMode {
    /// Provider selection is deferred to the coordination service
    #[default]
    Auto,
    /// Provider is assigned explicitly by the task creator
    Manual,
}

impl BidMode {
    /// Numeric code used by the Swan API.
    pub fn code(&self) -> u8 {
        match self {
            BidMode::Manual => 0,
            BidMode::Auto => 1,
        }
    }
}

/// Where CAR files are served from for retrieval by providers
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum StorageServerType {
    #[default]
    #[serde(rename = "ipfs server")]
    IpfsServer,
    #[serde(rename = "web server")]
    WebServer,
}

/// Swan coordination service credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwanApiConfig {
    #[serde(default = "default_swan_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub access_token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for SwanApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_swan_api_url(),
            api_key: String::new(),
            access_token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_swan_api_url() -> String {
    "https://go-swan-server.filswan.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Deal proposal settings for private tasks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DealConfig {
    #[serde(default)]
    pub lotus: LotusConfig,
    /// Wallet address paying for the deals
    #[serde(default)]
    pub sender_wallet: String,
    /// Deal duration in epochs
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// Price per GiB per epoch; the task's max price is used when absent
    #[serde(default)]
    pub max_price: Option<String>,
    /// Copied from the task's `verified_deal` before deals are sent
    #[serde(skip, default = "default_true")]
    pub verified_deal: bool,
    /// Copied from the task's `fast_retrieval` before deals are sent
    #[serde(skip, default = "default_true")]
    pub fast_retrieval: bool,
}

impl Default for DealConfig {
    fn default() -> Self {
        Self {
            lotus: LotusConfig::default(),
            sender_wallet: String::new(),
            duration: default_duration(),
            max_price: None,
            verified_deal: true,
            fast_retrieval: true,
        }
    }
}

fn default_duration() -> u64 {
    1_512_000
}

/// Lotus node JSON-RPC endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LotusConfig {
    #[serde(default = "default_lotus_url")]
    pub api_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for LotusConfig {
    fn default() -> Self {
        Self {
            api_url: default_lotus_url(),
            access_token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_lotus_url() -> String {
    "http://127.0.0.1:1234/rpc/v0".to_string()
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub task_name: Option<String>,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub public_deal: bool,
    pub offline_mode: bool,
    pub swan_api_url: String,
    pub swan_api_key_configured: bool,
    pub swan_access_token_configured: bool,
    pub lotus_api_url: String,
    pub lotus_token_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            task_name: config.task.task_name.clone(),
            input_dir: config.task.input_dir.clone(),
            output_dir: config.task.output_dir.clone(),
            public_deal: config.task.public_deal,
            offline_mode: config.task.offline_mode,
            swan_api_url: config.task.swan.api_url.clone(),
            swan_api_key_configured: !config.task.swan.api_key.is_empty(),
            swan_access_token_configured: !config.task.swan.access_token.is_empty(),
            lotus_api_url: config.deal.lotus.api_url.clone(),
            lotus_token_configured: !config.deal.lotus.access_token.is_empty(),
        }
    }
}
