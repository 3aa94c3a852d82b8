//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled route prefixes
//! - Decide whether a request path is proxied or passed through
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (acceptable for typical route counts)
//! - Existence only: the decision carries no selected route

use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Outcome of classifying a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Path is on the allow-list; forward to the proxy target.
    Proxy,
    /// No route matched; forward to the original origin untouched.
    Passthrough,
}

/// Ordered, immutable allow-list of route prefixes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    matchers: Vec<PathPrefixMatcher>,
}

impl RouteTable {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matchers: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }

    /// Returns true if any configured prefix matches `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    pub fn classify(&self, path: &str) -> RouteDecision {
        if self.matches(path) {
            RouteDecision::Proxy
        } else {
            RouteDecision::Passthrough
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(PathPrefixMatcher::prefix)
    }
}
