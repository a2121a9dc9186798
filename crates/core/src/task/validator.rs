use std::str::FromStr;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::{BidMode, TaskConfig};
use crate::error::TaskError;

/// Values resolved while validating a task configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTask {
    /// Configured task name, or the timestamp default.
    pub task_name: String,
    pub max_price: Decimal,
    /// Non-fatal configuration problems, already logged.
    pub warnings: Vec<String>,
}

/// Returns the default task name for the given creation time.
pub fn default_task_name(now: DateTime<Local>) -> String {
    format!("task_{}", now.format("%Y-%m-%d_%H:%M:%S"))
}

/// Checks the task configuration and resolves the task name and max price.
///
/// Nothing is written or mutated; callers can run this before touching the
/// file system.
pub fn validate_task_config(config: &TaskConfig) -> Result<ValidatedTask, TaskError> {
    let miner_fid = non_empty(&config.miner_fid);

    if !config.public_deal && miner_fid.is_none() {
        return Err(TaskError::Config {
            field: "miner_fid",
            reason: "a storage provider is required for private deals".to_string(),
        });
    }

    let mut warnings = Vec::new();
    if config.bid_mode == BidMode::Auto {
        if let Some(miner) = miner_fid {
            warn!(
                miner_fid = miner,
                "Storage provider is unnecessary for auto-bid tasks, it will be ignored"
            );
            warnings.push(format!(
                "storage provider {} is ignored for auto-bid tasks",
                miner
            ));
        }
    }

    let max_price = parse_max_price(&config.max_price)?;

    let task_name = match non_empty(&config.task_name) {
        Some(name) => name.to_string(),
        None => default_task_name(Local::now()),
    };

    Ok(ValidatedTask {
        task_name,
        max_price,
        warnings,
    })
}

fn parse_max_price(value: &str) -> Result<Decimal, TaskError> {
    // rust_decimal tolerates `_` separators; prices must be plain decimals
    if let Some(c) = value.chars().find(|c| c.is_whitespace() || *c == '_') {
        return Err(TaskError::InvalidMaxPrice {
            value: value.to_string(),
            reason: format!("unexpected character {:?}", c),
        });
    }

    let price = Decimal::from_str(value).map_err(|e| TaskError::InvalidMaxPrice {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if price < Decimal::ZERO {
        return Err(TaskError::InvalidMaxPrice {
            value: value.to_string(),
            reason: "price cannot be negative".to_string(),
        });
    }

    Ok(price)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Logs a summary of the task settings.
pub fn log_task_settings(config: &TaskConfig) {
    info!("Task settings:");
    info!(public_deal = config.public_deal, "Public task");
    info!(verified_deal = config.verified_deal, "Verified deals");
    info!(online = !config.offline_mode, "Connected to Swan");
    info!(fast_retrieval = config.fast_retrieval, "Fast retrieval");
}
