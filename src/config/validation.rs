//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check identity provider identifiers are well formed and consistent
//! - Validate addresses, URLs and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShellConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{AuthConfig, ObservabilityConfig, ShellConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];
const OAUTH_URL_KEYS: &[&str] = &["redirectSignIn", "redirectSignOut"];
const MAX_CLIENT_ID_LEN: usize = 128;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("auth.region {0:?} is not a region name like \"us-east-1\"")]
    InvalidRegion(String),

    #[error("auth.user_pool_id {0:?} is not of the form <region>_<id>")]
    InvalidUserPoolId(String),

    #[error("auth.user_pool_id {pool_id:?} belongs to region {pool_region:?}, not {region:?}")]
    PoolRegionMismatch {
        pool_id: String,
        pool_region: String,
        region: String,
    },

    #[error("auth.user_pool_web_client_id {0:?} must be 1-128 ASCII alphanumeric characters")]
    InvalidClientId(String),

    #[error("auth.identity_pool_id {0:?} is not of the form <region>:<id>")]
    InvalidIdentityPoolId(String),

    #[error("{field} {value:?} is not a valid URL")]
    InvalidUrl { field: String, value: String },

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} {value:?} must be one of {allowed}")]
    UnknownOption {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(
        "auth.discovery_timeout_secs ({discovery_secs}) must be below \
         timeouts.request_secs ({request_secs}) when auth.verify_on_startup is set"
    )]
    DiscoveryOutlastsRequest { discovery_secs: u64, request_secs: u64 },
}

/// Validate a whole configuration, collecting every problem found.
pub fn validate_config(config: &ShellConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    collect_auth_errors(&mut errors, &config.auth);
    // Requests held on the auth settle must not hit the request timeout first.
    if config.auth.verify_on_startup
        && config.timeouts.request_secs > 0
        && config.auth.discovery_timeout_secs >= config.timeouts.request_secs
    {
        errors.push(ValidationError::DiscoveryOutlastsRequest {
            discovery_secs: config.auth.discovery_timeout_secs,
            request_secs: config.timeouts.request_secs,
        });
    }
    collect_observability_errors(&mut errors, &config.observability);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the identity provider section.
///
/// Used by the auth bootstrap, which must refuse a bad pool even when the
/// config did not come through [`validate_config`].
pub fn validate_auth(auth: &AuthConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    collect_auth_errors(&mut errors, auth);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_auth_errors(errors: &mut Vec<ValidationError>, auth: &AuthConfig) {
    let region = auth.region.trim();
    let region_ok = if region.is_empty() {
        errors.push(ValidationError::Missing("auth.region"));
        false
    } else if !is_region(region) {
        errors.push(ValidationError::InvalidRegion(auth.region.clone()));
        false
    } else {
        true
    };

    let pool_id = auth.user_pool_id.trim();
    if pool_id.is_empty() {
        errors.push(ValidationError::Missing("auth.user_pool_id"));
    } else {
        match pool_id.split_once('_') {
            Some((pool_region, id)) if is_region(pool_region) && is_alphanumeric(id) => {
                if region_ok && pool_region != region {
                    errors.push(ValidationError::PoolRegionMismatch {
                        pool_id: auth.user_pool_id.clone(),
                        pool_region: pool_region.to_string(),
                        region: region.to_string(),
                    });
                }
            }
            _ => errors.push(ValidationError::InvalidUserPoolId(auth.user_pool_id.clone())),
        }
    }

    let client_id = auth.user_pool_web_client_id.trim();
    if client_id.is_empty() {
        errors.push(ValidationError::Missing("auth.user_pool_web_client_id"));
    } else if client_id.len() > MAX_CLIENT_ID_LEN || !is_alphanumeric(client_id) {
        errors.push(ValidationError::InvalidClientId(
            auth.user_pool_web_client_id.clone(),
        ));
    }

    if let Some(identity_pool) = &auth.identity_pool_id {
        let well_formed = identity_pool
            .split_once(':')
            .is_some_and(|(r, id)| is_region(r) && !id.is_empty());
        if !well_formed {
            errors.push(ValidationError::InvalidIdentityPoolId(identity_pool.clone()));
        }
    }

    if let Some(endpoint) = &auth.endpoint {
        check_url(errors, "auth.endpoint".to_string(), endpoint);
    }

    for key in OAUTH_URL_KEYS {
        if let Some(value) = auth.oauth.get(*key).and_then(|v| v.as_str()) {
            check_url(errors, format!("auth.oauth.{key}"), value);
        }
    }

    if auth.verify_on_startup && auth.discovery_timeout_secs == 0 {
        errors.push(ValidationError::Zero("auth.discovery_timeout_secs"));
    }
}

fn collect_observability_errors(errors: &mut Vec<ValidationError>, obs: &ObservabilityConfig) {
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownOption {
            field: "observability.log_level",
            value: obs.log_level.clone(),
            allowed: LOG_LEVELS.join(", "),
        });
    }
    if !LOG_FORMATS.contains(&obs.log_format.as_str()) {
        errors.push(ValidationError::UnknownOption {
            field: "observability.log_format",
            value: obs.log_format.clone(),
            allowed: LOG_FORMATS.join(", "),
        });
    }
    if obs.metrics_enabled {
        check_address(errors, "observability.metrics_address", &obs.metrics_address);
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: String, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

/// Region names look like `us-east-1` or `us-gov-west-1`.
fn is_region(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    let Some((number, names)) = parts.split_last() else {
        return false;
    };
    names.len() >= 2
        && names
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_lowercase()))
        && !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
}

fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric())
}
