use super::{types::Config, ConfigError, StorageServerType};

/// Validate configuration
/// Currently validates:
/// - Swan API URL is set when running online
/// - Web server download prefix is set for the web server storage type
/// - Private tasks have a deal sender wallet
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let task = &config.task;

    if !task.offline_mode && task.swan.api_url.trim().is_empty() {
        return Err(ConfigError::invalid(
            "task.swan.api_url",
            "required in online mode",
        ));
    }

    if task.storage_server_type == StorageServerType::WebServer
        && task.web_server_download_url_prefix.trim().is_empty()
    {
        return Err(ConfigError::invalid(
            "task.web_server_download_url_prefix",
            "required for the web server storage type",
        ));
    }

    if !task.public_deal && config.deal.sender_wallet.trim().is_empty() {
        return Err(ConfigError::invalid(
            "deal.sender_wallet",
            "required for private tasks",
        ));
    }

    Ok(())
}
