//! Edge request router library.
//!
//! Classifies each request path against a static allow-list of route
//! prefixes. Matches are forwarded to the proxy target with their method,
//! headers, body, path and query intact, and configured headers are stripped
//! from the upstream response. Everything else passes through to the
//! original origin untouched.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
