//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate prefix conditions)
//!     → Return: Proxy or Passthrough
//!
//! Route Compilation (at startup):
//!     routes = ["/", "/payments", ...]
//!     → Compile prefix matchers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same decision

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, PathPrefixMatcher};
pub use router::{RouteDecision, RouteTable};
