//! Configuration loading from disk and environment.
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment
//! variables. Command-line flags are applied by the binary on top.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ShellConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_REGION: &str = "FEED_SHELL_AWS_REGION";
pub const ENV_USER_POOL_ID: &str = "FEED_SHELL_USER_POOL_ID";
pub const ENV_CLIENT_ID: &str = "FEED_SHELL_CLIENT_ID";
pub const ENV_IDENTITY_POOL_ID: &str = "FEED_SHELL_IDENTITY_POOL_ID";
pub const ENV_AUTH_ENDPOINT: &str = "FEED_SHELL_AUTH_ENDPOINT";
pub const ENV_BIND_ADDRESS: &str = "FEED_SHELL_BIND_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "FEED_SHELL_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration without validating it.
///
/// Reads the TOML file when a path is given, then applies environment
/// overrides through `lookup`.
pub fn load_unvalidated<F>(path: Option<&Path>, lookup: F) -> Result<ShellConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ShellConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);
    Ok(config)
}

/// Load and validate configuration from an optional TOML file and the
/// process environment.
pub fn load_config(path: Option<&Path>) -> Result<ShellConfig, ConfigError> {
    let config = load_unvalidated(path, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut ShellConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).and_then(|value| normalize_value(&value));

    if let Some(value) = read(ENV_REGION) {
        config.auth.region = value;
    }
    if let Some(value) = read(ENV_USER_POOL_ID) {
        config.auth.user_pool_id = value;
    }
    if let Some(value) = read(ENV_CLIENT_ID) {
        config.auth.user_pool_web_client_id = value;
    }
    if let Some(value) = read(ENV_IDENTITY_POOL_ID) {
        config.auth.identity_pool_id = Some(value);
    }
    if let Some(value) = read(ENV_AUTH_ENDPOINT) {
        config.auth.endpoint = Some(value);
    }
    if let Some(value) = read(ENV_BIND_ADDRESS) {
        config.listener.bind_address = value;
    }
    if let Some(value) = read(ENV_LOG_LEVEL) {
        config.observability.log_level = value;
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
