//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation event (path)
//!     → router.rs (ordered table lookup)
//!     → matcher.rs (normalize path, match segments, capture params)
//!     → Return: matched page + params, or NotFound
//!
//! Route Compilation (at startup):
//!     APP_ROUTES
//!     → Parse patterns
//!     → Reject duplicates and unreachable entries
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod page;
pub mod router;

pub use matcher::{normalize_path, PathParams, PatternError, RoutePattern, Segment};
pub use page::Page;
pub use router::{
    build_route_table, Resolution, RouteEntry, RouteMatch, RouteTable, RouteTableError, APP_ROUTES,
};
