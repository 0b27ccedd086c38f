//! Routing and auth bootstrap for the social feed web shell.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use auth::{AuthBootstrap, AuthContext, AuthStatus};
pub use config::ShellConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
pub use routing::{build_route_table, Page, Resolution, RouteTable};
