use serde::{Deserialize, Serialize};

/// One CAR file and its deal metadata.
///
/// Fields up to `source_file_size` come from the upload stage; the rest are
/// filled in while the task is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub car_file_name: String,
    #[serde(default)]
    pub car_file_path: String,
    #[serde(default)]
    pub car_file_size: u64,
    #[serde(default)]
    pub car_file_md5: Option<String>,
    #[serde(default)]
    pub data_cid: String,
    #[serde(default)]
    pub piece_cid: String,
    #[serde(default)]
    pub source_file_name: Option<String>,
    #[serde(default)]
    pub source_file_path: Option<String>,
    #[serde(default)]
    pub source_file_size: Option<u64>,
    /// Download URL when CARs are served by a web server
    #[serde(default)]
    pub car_file_url: Option<String>,
    /// Task identity shared by every file in the batch
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub miner_fid: Option<String>,
    #[serde(default)]
    pub start_epoch: Option<i64>,
    /// Deal proposal CID, set when a deal was sent for this file
    #[serde(default)]
    pub deal_cid: Option<String>,
}
