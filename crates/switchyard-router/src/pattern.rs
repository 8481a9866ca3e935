//! Declared-path compilation and segment matching.
//!
//! A declared path such as `/users/:id/items/:itemId` is split on `/` into
//! segments. A segment that starts with `:` followed by at least one
//! character is a parameter; every other segment is a literal that must
//! appear byte-for-byte in the request path.
//!
//! Empty segments are kept on both sides, so `/users/42/` has one more
//! segment than `/users/:id` and does not match it.

use std::cmp::Ordering;

use crate::params::Params;

/// One segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// Matches any single non-empty segment and binds it to this name.
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) if !name.is_empty() => Self::Param(name.to_string()),
            _ => Self::Literal(raw.to_string()),
        }
    }

    fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(text) => text == candidate,
            Self::Param(_) => !candidate.is_empty(),
        }
    }

    /// Returns true for a parameter segment.
    #[must_use]
    pub fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }
}

/// A declared path compiled into positional segments.
///
/// # Example
///
/// ```rust
/// use switchyard_router::Pattern;
///
/// let pattern = Pattern::compile("/users/:id/items/:itemId");
/// assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["id", "itemId"]);
///
/// let params = pattern.extract("/users/42/items/7").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("itemId"), Some("7"));
///
/// assert!(!pattern.matches("/users/42/items"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    path: String,
    segments: Vec<Segment>,
    param_count: usize,
}

impl Pattern {
    /// Compiles a declared path.
    ///
    /// Compilation never fails: anything that is not a `:name` segment is
    /// treated as literal text.
    #[must_use]
    pub fn compile(path: &str) -> Self {
        let segments: Vec<Segment> = path.split('/').map(Segment::parse).collect();
        let param_count = segments.iter().filter(|s| s.is_param()).count();

        Self {
            path: path.to_string(),
            segments,
            param_count,
        }
    }

    /// The path this pattern was compiled from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The compiled segments, in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of `/`-separated segments, including empty ones.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Returns true if the pattern declares no parameters.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.param_count == 0
    }

    /// Returns true if `path` matches this pattern end to end.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut incoming = path.split('/');
        for segment in &self.segments {
            match incoming.next() {
                Some(candidate) if segment.accepts(candidate) => {}
                _ => return false,
            }
        }
        incoming.next().is_none()
    }

    /// Matches `path` and binds every parameter to its segment.
    ///
    /// Returns `None` when the path does not match. Values are the raw
    /// segment text; no percent-decoding is applied.
    #[must_use]
    pub fn extract(&self, path: &str) -> Option<Params> {
        if !self.matches(path) {
            return None;
        }

        let mut params = Params::with_capacity(self.param_count);
        for (segment, value) in self.segments.iter().zip(path.split('/')) {
            if let Segment::Param(name) = segment {
                params.push(name.as_str(), value);
            }
        }
        Some(params)
    }

    /// Orders two patterns by specificity.
    ///
    /// Segments are compared left to right. At the first position where one
    /// pattern has a literal and the other a parameter, the literal side is
    /// more specific and compares as `Ordering::Greater`. Patterns with no
    /// such position compare equal.
    #[must_use]
    pub fn specificity(&self, other: &Self) -> Ordering {
        self.segments
            .iter()
            .zip(&other.segments)
            .find_map(|(ours, theirs)| match (ours.is_param(), theirs.is_param()) {
                (false, true) => Some(Ordering::Greater),
                (true, false) => Some(Ordering::Less),
                _ => None,
            })
            .unwrap_or(Ordering::Equal)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}
