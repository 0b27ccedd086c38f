//! Route pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse route patterns (`/messages/@:handle`) into segments
//! - Normalize incoming paths (query, fragment, trailing slash)
//! - Match a path against a pattern, capturing named segments
//!
//! # Design Decisions
//! - Literal matching is case-sensitive
//! - A named segment matches exactly one non-empty path segment
//! - Literal text fused before the `:` marker is a required prefix and is
//!   never part of the captured value
//! - No regex: matching is a single pass over the segments

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Errors raised while parsing a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern {0:?} must start with '/'")]
    NotAbsolute(String),

    #[error("pattern {0:?} contains an empty segment")]
    EmptySegment(String),

    #[error("pattern {pattern:?} has an invalid parameter in segment {segment:?}")]
    InvalidParam { pattern: String, segment: String },

    #[error("pattern {pattern:?} binds {name:?} more than once")]
    DuplicateParam { pattern: String, name: String },

    #[error("pattern {pattern:?} contains {found:?}, which never reaches the matcher")]
    ReservedChar { pattern: String, found: char },
}

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Captures the remainder of the path segment after `prefix`.
    Param { prefix: String, name: String },
}

impl Segment {
    fn matches<'p>(&self, input: &'p str) -> Option<Option<&'p str>> {
        match self {
            Segment::Literal(text) => (text == input).then_some(None),
            Segment::Param { prefix, .. } => input
                .strip_prefix(prefix.as_str())
                .filter(|value| !value.is_empty())
                .map(Some),
        }
    }

    /// True if every path segment accepted by `other` is accepted by `self`.
    fn covers(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (Segment::Literal(_), Segment::Param { .. }) => false,
            (Segment::Param { prefix, .. }, Segment::Literal(text)) => {
                text.len() > prefix.len() && text.starts_with(prefix.as_str())
            }
            (Segment::Param { prefix, .. }, Segment::Param { prefix: other, .. }) => {
                other.starts_with(prefix.as_str())
            }
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => write!(f, "{text}"),
            Segment::Param { prefix, name } => write!(f, "{prefix}:{name}"),
        }
    }
}

/// A parsed route pattern such as `/@:handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern. Trailing slashes are ignored, so `/messages/` and
    /// `/messages` are the same pattern.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::NotAbsolute(raw.to_string()));
        }
        if let Some(found) = raw.chars().find(|c| matches!(c, '?' | '#')) {
            return Err(PatternError::ReservedChar {
                pattern: raw.to_string(),
                found,
            });
        }

        let trimmed = raw.trim_end_matches('/');
        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        if !trimmed.is_empty() {
            for part in trimmed[1..].split('/') {
                if part.is_empty() {
                    return Err(PatternError::EmptySegment(raw.to_string()));
                }
                let segment = match part.split_once(':') {
                    None => Segment::Literal(part.to_string()),
                    Some((prefix, name)) => {
                        if !is_param_name(name) {
                            return Err(PatternError::InvalidParam {
                                pattern: raw.to_string(),
                                segment: part.to_string(),
                            });
                        }
                        if names.contains(&name) {
                            return Err(PatternError::DuplicateParam {
                                pattern: raw.to_string(),
                                name: name.to_string(),
                            });
                        }
                        names.push(name);
                        Segment::Param {
                            prefix: prefix.to_string(),
                            name: name.to_string(),
                        }
                    }
                };
                segments.push(segment);
            }
        }

        let raw = if trimmed.is_empty() { "/" } else { trimmed };
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the pattern has no named segments.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// The pattern with parameter names erased. Two patterns with the same
    /// shape match exactly the same paths.
    pub fn shape(&self) -> String {
        let mut shape = String::new();
        for segment in &self.segments {
            shape.push('/');
            match segment {
                Segment::Literal(text) => shape.push_str(text),
                Segment::Param { prefix, .. } => {
                    shape.push_str(prefix);
                    shape.push(':');
                }
            }
        }
        if shape.is_empty() {
            shape.push('/');
        }
        shape
    }

    /// True if every path matched by `other` is also matched by `self`, so
    /// `other` placed after `self` could never be reached.
    pub fn covers(&self, other: &RoutePattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.covers(b))
    }

    /// Match a path against this pattern, returning the captured segments.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let path = normalize_path(path);
        let inputs = split_path(path);
        if inputs.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::default();
        for (segment, input) in self.segments.iter().zip(inputs) {
            if let Some(value) = segment.matches(input)? {
                if let Segment::Param { name, .. } = segment {
                    params.push(name.clone(), value.to_string());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Values captured from named segments, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn push(&mut self, name: String, value: String) {
        self.values.push((name, value));
    }
}

impl Serialize for PathParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Normalize a request path: drop query and fragment, strip trailing
/// slashes, and treat an empty path as the root.
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn split_path(normalized: &str) -> Vec<&str> {
    match normalized.strip_prefix('/') {
        Some("") => Vec::new(),
        Some(rest) => rest.split('/').collect(),
        // Relative input is never a valid route.
        None => vec![""],
    }
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
