//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Proxy target, route allow-list and response header removal.
    pub proxy: RouteConfig,

    /// Original origin for traffic that matches no route.
    pub passthrough: PassthroughConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Scheme used for the outbound call to the proxy target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamScheme {
    Http,
    #[default]
    Https,
}

impl UpstreamScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamScheme::Http => "http",
            UpstreamScheme::Https => "https",
        }
    }
}

impl std::fmt::Display for UpstreamScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which requests are proxied, where they go, and what is stripped on the way back.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Upstream host (optionally `host:port`) for matched requests.
    pub target: String,

    /// Outbound scheme for matched requests.
    pub scheme: UpstreamScheme,

    /// Ordered path prefixes. `"/"` matches every path.
    pub routes: Vec<String>,

    /// Response headers removed from proxied responses (case-insensitive).
    pub strip_response_headers: Vec<String>,
}

/// Original destination for unmatched requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PassthroughConfig {
    /// Base URL of the fronted origin (e.g., "http://127.0.0.1:3000").
    pub origin: String,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:3000".to_string(),
        }
    }
}

/// Outbound timeouts. Unset means no timeout is applied.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: Option<u64>,

    /// Total time allowed for an outbound request in seconds.
    pub upstream_secs: Option<u64>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
