//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Compile the route table
//! - Run the auth bootstrap before anything can render
//! - Start the optional identity provider verification
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::auth::{spawn_verification, AuthBootstrap, BootstrapError};
use crate::config::{validate_config, ConfigError, ShellConfig};
use crate::routing::{build_route_table, RouteTable, RouteTableError};

/// Anything that stops the shell from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("route table: {0}")]
    Routes(#[from] RouteTableError),

    #[error(transparent)]
    Auth(#[from] BootstrapError),
}

/// The initialized shell: configuration, routes and auth, ready to serve.
pub struct Application {
    pub config: ShellConfig,
    pub table: Arc<RouteTable>,
    pub auth: Arc<AuthBootstrap>,
}

impl Application {
    /// Validate, compile routes and bootstrap auth, in that order.
    pub fn bootstrap(config: ShellConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let table = Arc::new(build_route_table()?);
        tracing::info!(routes = table.len(), "Route table compiled");

        let auth = Arc::new(AuthBootstrap::new());
        auth.initialize(&config.auth)?;

        Ok(Self {
            config,
            table,
            auth,
        })
    }

    /// Start identity provider verification when configured.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_verification(&self) -> Option<JoinHandle<()>> {
        if !self.config.auth.verify_on_startup {
            return None;
        }
        Some(spawn_verification(self.auth.clone(), reqwest::Client::new()))
    }
}
