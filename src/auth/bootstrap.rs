//! One-time installation of the identity-provider connection.
//!
//! # Responsibilities
//! - Validate the auth configuration before anything can use it
//! - Install the [`AuthContext`] exactly once
//! - Publish the settle state (`Pending` → `Ready` | `Failed`)
//!
//! # Design Decisions
//! - The bootstrap is an explicit object passed by `Arc`, not a global
//! - A second `initialize` is an error and leaves the first context intact
//! - Status only ever leaves `Pending` once

use std::fmt;
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tokio::sync::watch;

use crate::auth::context::AuthContext;
use crate::config::{validate_auth, AuthConfig, ValidationError};
use crate::observability::metrics;

/// Errors raised by the auth bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("invalid auth configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("invalid identity endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("auth bootstrap already initialized")]
    AlreadyInitialized,

    #[error("auth bootstrap has not been initialized")]
    NotInitialized,

    #[error("auth bootstrap has not settled yet")]
    NotSettled,

    #[error("auth bootstrap failed: {0}")]
    Failed(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Settle state of the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Pending,
    Ready,
    Failed(String),
}

impl AuthStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, AuthStatus::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AuthStatus::Ready)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthStatus::Pending => "pending",
            AuthStatus::Ready => "ready",
            AuthStatus::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatus::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Installs the identity-provider connection once per process.
pub struct AuthBootstrap {
    context: OnceLock<Arc<AuthContext>>,
    status: watch::Sender<AuthStatus>,
}

impl AuthBootstrap {
    pub fn new() -> Self {
        let (status, _) = watch::channel(AuthStatus::Pending);
        Self {
            context: OnceLock::new(),
            status,
        }
    }

    /// Validate `config` and install it.
    ///
    /// Settles immediately unless `verify_on_startup` is set, in which case
    /// the status stays `Pending` until [`settle`](Self::settle) is called
    /// (normally by the discovery task).
    pub fn initialize(&self, config: &AuthConfig) -> Result<Arc<AuthContext>, BootstrapError> {
        if self.context.get().is_some() {
            tracing::error!("Auth bootstrap invoked twice");
            return Err(BootstrapError::AlreadyInitialized);
        }

        if let Err(errors) = validate_auth(config) {
            metrics::record_bootstrap("invalid");
            tracing::error!(errors = errors.len(), "Auth configuration rejected");
            return Err(BootstrapError::InvalidConfig(errors));
        }

        let context = Arc::new(AuthContext::from_config(config)?);
        self.context
            .set(context.clone())
            .map_err(|_| BootstrapError::AlreadyInitialized)?;

        tracing::info!(
            region = %context.region(),
            user_pool_id = %context.user_pool_id(),
            issuer = %context.issuer(),
            verify = config.verify_on_startup,
            "Auth bootstrap initialized"
        );

        if !config.verify_on_startup {
            self.settle(Ok(()));
        }
        Ok(context)
    }

    /// Move from `Pending` to `Ready` or `Failed`. Later calls are ignored.
    pub fn settle(&self, result: Result<(), String>) {
        if self.context.get().is_none() {
            tracing::warn!("Ignoring settle before auth bootstrap initialized");
            return;
        }

        let next = match result {
            Ok(()) => AuthStatus::Ready,
            Err(reason) => AuthStatus::Failed(reason),
        };
        let label = next.label();

        let changed = self.status.send_if_modified(|status| {
            if status.is_pending() {
                *status = next;
                true
            } else {
                false
            }
        });

        if changed {
            metrics::record_bootstrap(label);
            tracing::info!(status = label, "Auth bootstrap settled");
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// Wait until the bootstrap has settled.
    ///
    /// Never resolves if [`initialize`](Self::initialize) is never called;
    /// check [`is_initialized`](Self::is_initialized) first.
    pub async fn settled(&self) -> AuthStatus {
        let mut rx = self.status.subscribe();
        let status = match rx.wait_for(|status| !status.is_pending()).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        status
    }

    pub fn is_initialized(&self) -> bool {
        self.context.get().is_some()
    }

    /// The installed context, whether or not it has settled.
    pub fn context(&self) -> Option<Arc<AuthContext>> {
        self.context.get().cloned()
    }

    /// The installed context, only once the bootstrap settled successfully.
    pub fn ready_context(&self) -> Result<Arc<AuthContext>, BootstrapError> {
        let context = self.context().ok_or(BootstrapError::NotInitialized)?;
        match self.status() {
            AuthStatus::Ready => Ok(context),
            AuthStatus::Pending => Err(BootstrapError::NotSettled),
            AuthStatus::Failed(reason) => Err(BootstrapError::Failed(reason)),
        }
    }
}

impl Default for AuthBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> AuthConfig {
        AuthConfig {
            region: "us-east-1".into(),
            user_pool_id: "us-east-1_KFMpUSnP5".into(),
            user_pool_web_client_id: "64s0p05ggkhfa6a8ni2ak9djf5".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_initialize_settles_ready_without_verification() {
        let bootstrap = AuthBootstrap::new();
        assert_eq!(bootstrap.status(), AuthStatus::Pending);
        assert_eq!(bootstrap.ready_context(), Err(BootstrapError::NotInitialized));

        let context = bootstrap.initialize(&config()).unwrap();
        assert_eq!(bootstrap.status(), AuthStatus::Ready);
        assert_eq!(bootstrap.ready_context().unwrap(), context);
    }

    #[test]
    fn test_empty_pool_id_fails_fast() {
        let bootstrap = AuthBootstrap::new();
        let mut config = config();
        config.user_pool_id = String::new();

        let err = bootstrap.initialize(&config).unwrap_err();
        assert_eq!(
            err,
            BootstrapError::InvalidConfig(vec![ValidationError::Missing("auth.user_pool_id")])
        );
        assert!(!bootstrap.is_initialized());
        assert_eq!(bootstrap.status(), AuthStatus::Pending);
    }

    #[test]
    fn test_second_initialize_is_rejected() {
        let bootstrap = AuthBootstrap::new();
        let first = bootstrap.initialize(&config()).unwrap();

        let mut other = config();
        other.user_pool_web_client_id = "someotherclient".into();
        assert_eq!(
            bootstrap.initialize(&other),
            Err(BootstrapError::AlreadyInitialized)
        );
        assert_eq!(bootstrap.context().unwrap(), first);
    }

    #[test]
    fn test_settle_only_once() {
        let bootstrap = AuthBootstrap::new();
        let mut config = config();
        config.verify_on_startup = true;
        bootstrap.initialize(&config).unwrap();
        assert_eq!(bootstrap.ready_context(), Err(BootstrapError::NotSettled));

        bootstrap.settle(Err("discovery timed out".into()));
        bootstrap.settle(Ok(()));
        assert_eq!(bootstrap.status(), AuthStatus::Failed("discovery timed out".into()));
        assert_eq!(
            bootstrap.ready_context(),
            Err(BootstrapError::Failed("discovery timed out".into()))
        );
    }

    #[test]
    fn test_settle_before_initialize_is_ignored() {
        let bootstrap = AuthBootstrap::new();
        bootstrap.settle(Ok(()));
        assert_eq!(bootstrap.status(), AuthStatus::Pending);
    }

    #[tokio::test]
    async fn test_settled_waits_for_background_settle() {
        let bootstrap = Arc::new(AuthBootstrap::new());
        let mut config = config();
        config.verify_on_startup = true;
        bootstrap.initialize(&config).unwrap();

        let waiter = {
            let bootstrap = bootstrap.clone();
            tokio::spawn(async move { bootstrap.settled().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        bootstrap.settle(Ok(()));
        let status = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status, AuthStatus::Ready);
    }

    #[tokio::test]
    async fn test_settled_returns_at_once_when_already_settled() {
        let bootstrap = AuthBootstrap::new();
        bootstrap.initialize(&config()).unwrap();

        let status = tokio::time::timeout(Duration::from_millis(100), bootstrap.settled())
            .await
            .unwrap();
        assert_eq!(status, AuthStatus::Ready);
    }
}
