//! Response handling and transformation.
//!
//! # Responsibilities
//! - Strip configured headers from proxied responses
//! - Map outbound failures to appropriate HTTP status codes
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Header removal is case-insensitive and idempotent
//! - Upstream timeouts result in 504 Gateway Timeout, everything else in 502

use axum::{
    http::{header::InvalidHeaderName, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};

/// Removes a fixed set of headers from responses.
#[derive(Debug, Clone, Default)]
pub struct HeaderStripper {
    names: Vec<HeaderName>,
}

impl HeaderStripper {
    /// Build a stripper from header names in any case.
    pub fn new<I, S>(names: I) -> Result<Self, InvalidHeaderName>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed: Vec<HeaderName> = Vec::new();
        for name in names {
            // HeaderName lowercases on parse, so comparison is case-insensitive.
            let name = HeaderName::from_bytes(name.as_ref().as_bytes())?;
            if !parsed.contains(&name) {
                parsed.push(name);
            }
        }
        Ok(Self { names: parsed })
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[HeaderName] {
        &self.names
    }

    /// Remove every value of every configured header.
    pub fn strip(&self, headers: &mut HeaderMap) {
        for name in &self.names {
            headers.remove(name);
        }
    }

    /// Strip headers from a response, leaving status and body untouched.
    pub fn apply(&self, mut response: Response) -> Response {
        if !self.is_empty() {
            self.strip(response.headers_mut());
        }
        response
    }
}

/// Failure of an outbound call.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid outbound URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("upstream timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("failed to build outbound client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ForwardError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout(err)
        } else {
            ForwardError::Upstream(err)
        }
    }

    /// Status returned to the original caller for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ForwardError::InvalidUrl { .. } | ForwardError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let message = match self.status_code() {
            StatusCode::GATEWAY_TIMEOUT => "Upstream request timed out",
            StatusCode::BAD_GATEWAY => "Upstream request failed",
            _ => "Internal proxy error",
        };
        (self.status_code(), message).into_response()
    }
}
