//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to the request handler
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup and never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::PassthroughConfig;
pub use schema::ProxyConfig;
pub use schema::RouteConfig;
pub use schema::TimeoutConfig;
pub use schema::UpstreamScheme;
pub use validation::{validate_config, ValidationError};
