//! Outbound forwarding.
//!
//! # Responsibilities
//! - Rewrite matched requests to `<scheme>://<target><path><query>`
//! - Send unmatched requests to the original origin untouched
//! - Stream request and response bodies without buffering
//!
//! # Design Decisions
//! - Method, headers (including `Host`) and body are forwarded verbatim
//! - Redirects are relayed to the caller, never followed
//! - One attempt per request: no retry, no fallback between destinations
//! - Timeouts only when configured
//! - Paths arrive normalized by the handler, so parsing the outbound URL
//!   cannot move a request off the path it was routed on

use std::time::Duration;

use axum::{
    body::{Body, HttpBody},
    http::Request,
    response::Response,
};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::{ProxyConfig, UpstreamScheme};
use crate::http::response::ForwardError;

/// Destination for a request on the allow-list. An empty query is dropped.
pub fn build_upstream_url(
    scheme: UpstreamScheme,
    target: &str,
    path: &str,
    query: Option<&str>,
) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{}://{}{}?{}", scheme, target, path, q),
        None => format!("{}://{}{}", scheme, target, path),
    }
}

/// Destination for a request that matched no route.
pub fn build_origin_url(origin: &str, path: &str, query: Option<&str>) -> String {
    let base = origin.trim_end_matches('/');
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{}{}?{}", base, path, q),
        None => format!("{}{}", base, path),
    }
}

/// Shared outbound client plus the two destinations it can send to.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    scheme: UpstreamScheme,
    target: String,
    origin: String,
}

impl Forwarder {
    pub fn new(config: &ProxyConfig) -> Result<Self, ForwardError> {
        let mut builder = reqwest::Client::builder().redirect(Policy::none());
        if let Some(secs) = config.timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ForwardError::Client)?;

        Ok(Self {
            client,
            scheme: config.proxy.scheme,
            target: config.proxy.target.clone(),
            origin: config.passthrough.origin.clone(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Forward a matched request to the proxy target.
    pub async fn proxy(&self, request: Request<Body>) -> Result<Response, ForwardError> {
        let url = build_upstream_url(
            self.scheme,
            &self.target,
            request.uri().path(),
            request.uri().query(),
        );

        tracing::info!(
            target_host = %self.target,
            path = %request.uri().path(),
            "Proxy to {}{}",
            self.target,
            request.uri().path()
        );

        self.send(url, request).await
    }

    /// Forward an unmatched request to the original origin.
    pub async fn passthrough(&self, request: Request<Body>) -> Result<Response, ForwardError> {
        let url = build_origin_url(&self.origin, request.uri().path(), request.uri().query());

        tracing::debug!(origin = %self.origin, path = %request.uri().path(), "Passthrough");

        self.send(url, request).await
    }

    async fn send(&self, url: String, request: Request<Body>) -> Result<Response, ForwardError> {
        let url = Url::parse(&url).map_err(|source| ForwardError::InvalidUrl { url, source })?;

        let (parts, body) = request.into_parts();
        let mut outbound = self
            .client
            .request(parts.method, url)
            .headers(parts.headers);
        if !body.is_end_stream() {
            outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let mut upstream = outbound.send().await.map_err(ForwardError::from_reqwest)?;

        let status = upstream.status();
        let headers = std::mem::take(upstream.headers_mut());
        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;

        Ok(response)
    }
}
