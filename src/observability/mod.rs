//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → one event per incoming request (method, URL, request ID)
//!     → one event per proxy decision (target, path)
//!     → logging.rs routes them to stdout (pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every event for a request
//! - Events are informational only; nothing depends on their format

pub mod logging;

pub use logging::init_logging;
