//! Startup verification against the provider's discovery document.
//!
//! Runs in the background when `auth.verify_on_startup` is set and settles
//! the bootstrap. There are no retries: a failed check leaves the bootstrap
//! `Failed` for the life of the process.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::auth::bootstrap::AuthBootstrap;
use crate::auth::context::AuthContext;

/// Errors raised while fetching the discovery document.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("discovery returned status {0}")]
    Status(u16),

    #[error("issuer mismatch: expected {expected}, provider reports {actual}")]
    IssuerMismatch { expected: String, actual: String },
}

/// The subset of the OpenID provider metadata the shell checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub jwks_uri: String,
    #[serde(default)]
    pub authorization_endpoint: Option<String>,
    #[serde(default)]
    pub token_endpoint: Option<String>,
}

/// Fetch the discovery document and check it describes our user pool.
pub async fn fetch_configuration(
    client: &reqwest::Client,
    context: &AuthContext,
    timeout: Duration,
) -> Result<OpenIdConfiguration, DiscoveryError> {
    let response = client
        .get(context.discovery_uri().clone())
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DiscoveryError::Status(status.as_u16()));
    }

    let document: OpenIdConfiguration = response.json().await?;

    let expected = context.issuer().as_str().trim_end_matches('/');
    if document.issuer.trim_end_matches('/') != expected {
        return Err(DiscoveryError::IssuerMismatch {
            expected: expected.to_string(),
            actual: document.issuer,
        });
    }

    Ok(document)
}

/// Verify the installed context and settle the bootstrap with the result.
pub async fn verify(bootstrap: &AuthBootstrap, client: &reqwest::Client) -> Option<OpenIdConfiguration> {
    let Some(context) = bootstrap.context() else {
        tracing::warn!("Discovery skipped: auth bootstrap not initialized");
        return None;
    };
    let timeout = Duration::from_secs(context.config().discovery_timeout_secs);

    tracing::debug!(url = %context.discovery_uri(), "Fetching identity provider discovery document");

    match fetch_configuration(client, &context, timeout).await {
        Ok(document) => {
            tracing::info!(jwks_uri = %document.jwks_uri, "Identity provider verified");
            bootstrap.settle(Ok(()));
            Some(document)
        }
        Err(e) => {
            tracing::error!(error = %e, "Identity provider verification failed");
            bootstrap.settle(Err(e.to_string()));
            None
        }
    }
}

/// Run [`verify`] on a background task.
pub fn spawn_verification(bootstrap: Arc<AuthBootstrap>, client: reqwest::Client) -> JoinHandle<()> {
    tokio::spawn(async move {
        verify(&bootstrap, &client).await;
    })
}
