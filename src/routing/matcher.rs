//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//! - Bound matches at a path separator
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A prefix matches itself exactly, or followed by `/`
//! - A prefix ending in `/` (including the root `/`) matches everything below it
//! - No regex to guarantee O(n) matching

/// Path separator used to bound prefix matches.
pub const SEPARATOR: char = '/';

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches a request path against a single route prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix(self.prefix.as_str()) else {
            return false;
        };

        rest.is_empty() || self.prefix.ends_with(SEPARATOR) || rest.starts_with(SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_nested() {
        let matcher = PathPrefixMatcher::new("/payments");

        assert!(matcher.matches("/payments"));
        assert!(matcher.matches("/payments/"));
        assert!(matcher.matches("/payments/invoice/42"));
    }

    #[test]
    fn test_not_separator_bounded() {
        let matcher = PathPrefixMatcher::new("/pay");

        assert!(!matcher.matches("/payroll"));
        assert!(!matcher.matches("/payments"));
        assert!(matcher.matches("/pay/slip"));
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = PathPrefixMatcher::new("/grants");

        assert!(!matcher.matches("/Grants"));
        assert!(!matcher.matches("/GRANTS/2024"));
    }

    #[test]
    fn test_anchored_at_start() {
        let matcher = PathPrefixMatcher::new("/trails");

        assert!(!matcher.matches("/about/trails"));
        assert!(!matcher.matches("trails"));
    }

    #[test]
    fn test_root_matches_everything() {
        let matcher = PathPrefixMatcher::new("/");

        assert!(matcher.matches("/"));
        assert!(matcher.matches("/unrelated"));
        assert!(matcher.matches("/a/b/c"));
        assert!(matcher.matches("//double"));
        assert!(!matcher.matches(""));
        assert!(!matcher.matches("relative"));
    }

    #[test]
    fn test_trailing_separator_prefix() {
        let matcher = PathPrefixMatcher::new("/docs/");

        assert!(matcher.matches("/docs/"));
        assert!(matcher.matches("/docs/intro"));
        assert!(!matcher.matches("/docs"));
        assert!(!matcher.matches("/docsearch"));
    }
}
