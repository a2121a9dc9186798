//! Lotus JSON-RPC deal sender.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::fs;
use tracing::{debug, info};

use crate::config::{DealConfig, LotusConfig};
use crate::manifest::FileDescriptor;

use super::{DealProposal, DealSender, DistributionError};

const BYTES_PER_GIB: u64 = 1 << 30;
const ATTO_FIL_PER_FIL: u64 = 1_000_000_000_000_000_000;

/// Sends deals through a Lotus node's `Filecoin.ClientStartDeal` method.
pub struct LotusDealSender {
    client: Client,
}

impl LotusDealSender {
    /// Create a new sender using the timeout from the Lotus configuration.
    pub fn new(config: &LotusConfig) -> Result<Self, DistributionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| DistributionError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Issue a JSON-RPC call and return its `result`.
    async fn call(
        &self,
        lotus: &LotusConfig,
        method: &str,
        params: Value,
    ) -> Result<Value, DistributionError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let mut request = self.client.post(&lotus.api_url).json(&body);
        if !lotus.access_token.is_empty() {
            request = request.bearer_auth(&lotus.access_token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DistributionError::Timeout
            } else if e.is_connect() {
                DistributionError::ConnectionFailed(e.to_string())
            } else {
                DistributionError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DistributionError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let rpc: RpcResponse = response
            .json()
            .await
            .map_err(|e| DistributionError::ApiError(format!("Failed to parse response: {}", e)))?;

        if let Some(err) = rpc.error {
            return Err(DistributionError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        rpc.result
            .ok_or_else(|| DistributionError::ApiError(format!("{} returned no result", method)))
    }

    /// Propose a single deal and return its CID.
    async fn start_deal(
        &self,
        config: &DealConfig,
        price_per_gib: Decimal,
        desc: &FileDescriptor,
    ) -> Result<DealProposal, DistributionError> {
        let miner_fid = desc
            .miner_fid
            .clone()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| missing("miner_fid", desc))?;
        if desc.data_cid.is_empty() {
            return Err(missing("data_cid", desc));
        }
        if desc.piece_cid.is_empty() {
            return Err(missing("piece_cid", desc));
        }
        let start_epoch = desc.start_epoch.ok_or_else(|| missing("start_epoch", desc))?;

        let padded = padded_piece_size(desc.car_file_size);
        let epoch_price = epoch_price_atto_fil(price_per_gib, padded)?;

        let params = json!([{
            "Data": {
                "TransferType": "manual",
                "Root": { "/": desc.data_cid },
                "PieceCid": { "/": desc.piece_cid },
                "PieceSize": padded / 128 * 127,
            },
            "Wallet": config.sender_wallet,
            "Miner": miner_fid,
            "EpochPrice": epoch_price,
            "MinBlocksDuration": config.duration,
            "DealStartEpoch": start_epoch,
            "FastRetrieval": config.fast_retrieval,
            "VerifiedDeal": config.verified_deal,
        }]);

        let result = self
            .call(&config.lotus, "Filecoin.ClientStartDeal", params)
            .await?;
        let deal_cid = result
            .get("/")
            .and_then(Value::as_str)
            .ok_or_else(|| DistributionError::ApiError(format!("Unexpected deal CID: {}", result)))?
            .to_string();

        debug!(
            car_file = %desc.car_file_name,
            miner = %miner_fid,
            deal_cid = %deal_cid,
            "Deal proposed"
        );

        Ok(DealProposal {
            car_file_name: desc.car_file_name.clone(),
            miner_fid,
            deal_cid,
            start_epoch,
        })
    }
}

#[async_trait]
impl DealSender for LotusDealSender {
    fn name(&self) -> &str {
        "lotus"
    }

    async fn send_deals(
        &self,
        config: &DealConfig,
        task_name: &str,
        output_dir: &Path,
        file_descs: &mut [FileDescriptor],
    ) -> Result<Vec<DealProposal>, DistributionError> {
        let price = config.max_price.as_deref().unwrap_or("0");
        let price_per_gib: Decimal = price
            .trim()
            .parse()
            .map_err(|e: rust_decimal::Error| DistributionError::InvalidPrice(e.to_string()))?;

        let mut proposals = Vec::with_capacity(file_descs.len());
        for desc in file_descs.iter_mut() {
            let proposal = self.start_deal(config, price_per_gib, desc).await?;
            desc.deal_cid = Some(proposal.deal_cid.clone());
            proposals.push(proposal);
        }

        let path = output_dir.join(format!("{}-deals.json", task_name));
        let json = serde_json::to_vec_pretty(&proposals).map_err(std::io::Error::from)?;
        fs::write(&path, json).await?;

        info!(
            task = task_name,
            deals = proposals.len(),
            path = %path.display(),
            "Deals sent"
        );
        Ok(proposals)
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

fn missing(field: &'static str, desc: &FileDescriptor) -> DistributionError {
    DistributionError::MissingField {
        field,
        car_file_name: desc.car_file_name.clone(),
    }
}

/// Smallest power-of-two padded piece size that holds `car_file_size` bytes
/// after Fr32 padding.
pub fn padded_piece_size(car_file_size: u64) -> u64 {
    let mut padded = 128u64;
    while padded / 128 * 127 < car_file_size {
        padded <<= 1;
    }
    padded
}

/// Converts a FIL-per-GiB-per-epoch price into attoFIL per epoch for a piece.
fn epoch_price_atto_fil(price_per_gib: Decimal, padded_size: u64) -> Result<String, DistributionError> {
    let overflow = || DistributionError::InvalidPrice(format!("{} overflows", price_per_gib));

    let price = price_per_gib
        .checked_mul(Decimal::from(ATTO_FIL_PER_FIL))
        .ok_or_else(overflow)?
        .checked_mul(Decimal::from(padded_size))
        .ok_or_else(overflow)?
        .checked_div(Decimal::from(BYTES_PER_GIB))
        .ok_or_else(overflow)?;

    Ok(price.trunc().normalize().to_string())
}
