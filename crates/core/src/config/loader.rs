use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "DEALTASK_";

/// Load configuration from a TOML file, then apply `DEALTASK_*` overrides.
///
/// Nested keys are separated by a double underscore, e.g.
/// `DEALTASK_TASK__OFFLINE_MODE=true` or `DEALTASK_DEAL__LOTUS__API_URL=...`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(layered(path, ENV_PREFIX))
}

/// Parse configuration from a TOML string, without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    extract(Figment::from(Toml::string(toml_str)))
}

fn layered(path: &Path, env_prefix: &str) -> Figment {
    Figment::from(Toml::file(path)).merge(Env::prefixed(env_prefix).split("__"))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
