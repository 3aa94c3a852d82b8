//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject configurations that would produce malformed outbound URLs
//! - Validate header names and route prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - An empty route list is valid: every request passes through

use std::net::SocketAddr;

use axum::http::HeaderName;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("proxy.target must not be empty")]
    EmptyTarget,

    #[error("proxy.target `{0}` must be a bare host, without scheme or path")]
    TargetNotHost(String),

    #[error("route prefix `{0}` must start with `/`")]
    RoutePrefix(String),

    #[error("`{0}` is not a valid header name")]
    HeaderName(String),

    #[error("passthrough.origin `{0}` must be an absolute http(s) URL")]
    Origin(String),
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    validate_target(&config.proxy.target, &mut errors);

    for prefix in &config.proxy.routes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::RoutePrefix(prefix.clone()));
        }
    }

    for name in &config.proxy.strip_response_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::HeaderName(name.clone()));
        }
    }

    match Url::parse(&config.passthrough.origin) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::Origin(config.passthrough.origin.clone())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_target(target: &str, errors: &mut Vec<ValidationError>) {
    if target.trim().is_empty() {
        errors.push(ValidationError::EmptyTarget);
        return;
    }

    // The target is spliced between the scheme and the request path, so it
    // has to parse as nothing more than an authority.
    let parsed = Url::parse(&format!("https://{target}"));
    let is_bare_host = match parsed {
        Ok(url) => {
            url.path() == "/"
                && url.query().is_none()
                && url.username().is_empty()
                && !target.contains('/')
                && !target.contains('?')
                && !target.contains('#')
        }
        Err(_) => false,
    };
    if !is_bare_host {
        errors.push(ValidationError::TargetNotHost(target.to_string()));
    }
}
