//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shell.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration for the feed shell.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Identity provider connection parameters.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds. Covers waiting for auth to settle.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Connection parameters for the managed user-pool identity provider.
///
/// Handed verbatim to the identity client. There are no
/// defaults for the pool identifiers: an unconfigured pool fails validation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Region hosting the user pool (e.g., "us-east-1").
    #[serde(alias = "aws_cognito_region", alias = "aws_project_region")]
    pub region: String,

    /// User pool identifier, `<region>_<id>`.
    #[serde(alias = "userPoolId", alias = "aws_user_pools_id")]
    pub user_pool_id: String,

    /// Public (secretless) app client identifier.
    #[serde(
        alias = "userPoolWebClientId",
        alias = "user_pool_client_id",
        alias = "aws_user_pools_web_client_id"
    )]
    pub user_pool_web_client_id: String,

    /// Optional identity pool, `<region>:<uuid>`.
    #[serde(alias = "identityPoolId")]
    pub identity_pool_id: Option<String>,

    /// OAuth options, passed through untouched. Usually empty.
    pub oauth: Map<String, Value>,

    /// Override for the identity service endpoint.
    pub endpoint: Option<String>,

    /// Fetch the provider's discovery document before reporting ready.
    pub verify_on_startup: bool,

    /// Discovery request timeout in seconds.
    pub discovery_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            user_pool_id: String::new(),
            user_pool_web_client_id: String::new(),
            identity_pool_id: None,
            oauth: Map::new(),
            endpoint: None,
            verify_on_startup: false,
            discovery_timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
