//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → request.rs (assign request ID)
//!     → [routing layer classifies path]
//!     → forward.rs (proxy target or original origin)
//!     → response.rs (strip headers on proxied responses, map errors)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{build_origin_url, build_upstream_url, Forwarder};
pub use request::{RequestId, RequestIdExt, X_REQUEST_ID};
pub use response::{ForwardError, HeaderStripper};
pub use server::{AppState, HttpServer, ServerError};
