//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → routing (resolve path → page)
//!     → auth bootstrap (await settle for auth-dependent pages)
//!     → response.rs (page descriptor or error body)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{PageView, ShellError};
pub use server::{AppState, HttpServer};
