//! Auth bootstrap subsystem.
//!
//! # Data Flow
//! ```text
//! ShellConfig.auth
//!     → bootstrap.rs (validate, install once)
//!     → context.rs (AuthContext: config + issuer/JWKS URLs)
//!     → discovery.rs (optional background check, settles status)
//!     → Arc<AuthBootstrap> handed to navigator and HTTP server
//! ```
//!
//! # Design Decisions
//! - Invalid configuration fails at startup, never on first use
//! - Consumers wait on the watch channel rather than polling
//! - The identity provider protocol is not reimplemented here

pub mod bootstrap;
pub mod context;
pub mod discovery;

pub use bootstrap::{AuthBootstrap, AuthStatus, BootstrapError};
pub use context::{AuthContext, ClientSettings};
pub use discovery::{spawn_verification, OpenIdConfiguration};
