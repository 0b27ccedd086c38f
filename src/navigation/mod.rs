//! Client-side navigation.
//!
//! # Data Flow
//! ```text
//! NavigationEvent (push / replace / back / forward)
//!     → history.rs (move the cursor)
//!     → routing (resolve current path)
//!     → auth bootstrap (await settle for auth-dependent pages)
//!     → PageRenderer
//! ```

pub mod history;
pub mod navigator;

pub use history::History;
pub use navigator::{NavigationEvent, NavigationOutcome, Navigator, PageRenderer};
