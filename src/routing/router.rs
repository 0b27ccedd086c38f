//! Route table and lookup.
//!
//! # Responsibilities
//! - Store the ordered route entries
//! - Reject duplicate and unreachable entries at construction
//! - Resolve a path to exactly one page, or an explicit not-found
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(n) scan in declaration order; first match wins
//! - Explicit NotFound rather than silent default

use thiserror::Error;

use crate::routing::matcher::{normalize_path, PathParams, PatternError, RoutePattern};
use crate::routing::page::Page;

/// The application's route surface, in precedence order.
pub const APP_ROUTES: &[(&str, Page)] = &[
    ("/", Page::HomeFeed),
    ("/notifications", Page::NotificationsFeed),
    ("/@:handle", Page::UserFeed),
    ("/messages", Page::MessageGroups),
    ("/messages/@:handle", Page::MessageGroup),
    ("/signup", Page::Signup),
    ("/signin", Page::Signin),
    ("/confirm", Page::Confirmation),
    ("/forgot", Page::Recover),
];

/// Errors raised while building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("route {pattern:?} duplicates {existing:?}")]
    Duplicate { pattern: String, existing: String },

    #[error("route {pattern:?} is unreachable: {shadowed_by:?} is tried first")]
    Unreachable { pattern: String, shadowed_by: String },
}

/// A pattern bound to the page that handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: RoutePattern,
    pub page: Page,
}

impl RouteEntry {
    pub fn new(pattern: &str, page: Page) -> Result<Self, RouteTableError> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            page,
        })
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: PathParams,
}

impl RouteMatch<'_> {
    pub fn page(&self) -> Page {
        self.entry.page
    }

    pub fn pattern(&self) -> &str {
        self.entry.pattern.as_str()
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Matched(RouteMatch<'a>),
    NotFound { path: String },
}

impl<'a> Resolution<'a> {
    pub fn matched(self) -> Option<RouteMatch<'a>> {
        match self {
            Resolution::Matched(m) => Some(m),
            Resolution::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound { .. })
    }
}

/// An ordered, validated set of routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table from entries in precedence order.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteTableError> {
        for (index, entry) in entries.iter().enumerate() {
            let earlier = &entries[..index];

            if let Some(existing) = earlier
                .iter()
                .find(|e| e.pattern.shape() == entry.pattern.shape())
            {
                return Err(RouteTableError::Duplicate {
                    pattern: entry.pattern.to_string(),
                    existing: existing.pattern.to_string(),
                });
            }

            if let Some(shadow) = earlier.iter().find(|e| e.pattern.covers(&entry.pattern)) {
                return Err(RouteTableError::Unreachable {
                    pattern: entry.pattern.to_string(),
                    shadowed_by: shadow.pattern.to_string(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Build a table from `(pattern, page)` pairs.
    pub fn from_routes(routes: &[(&str, Page)]) -> Result<Self, RouteTableError> {
        let entries = routes
            .iter()
            .map(|(pattern, page)| RouteEntry::new(pattern, *page))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a path to the first matching entry.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        for entry in &self.entries {
            if let Some(params) = entry.pattern.matches(path) {
                tracing::trace!(path = %path, pattern = %entry.pattern, page = %entry.page, "Route matched");
                return Resolution::Matched(RouteMatch { entry, params });
            }
        }
        Resolution::NotFound {
            path: normalize_path(path).to_string(),
        }
    }

    /// The pattern serving a page, if any.
    pub fn pattern_for(&self, page: Page) -> Option<&RoutePattern> {
        self.entries
            .iter()
            .find(|e| e.page == page)
            .map(|e| &e.pattern)
    }
}

/// Build the application's route table.
pub fn build_route_table() -> Result<RouteTable, RouteTableError> {
    RouteTable::from_routes(APP_ROUTES)
}
