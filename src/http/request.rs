//! Request identification.
//!
//! # Responsibilities
//! - Assign a request ID to every inbound request (reuse `x-request-id` if present)
//! - Expose the ID to handlers through request extensions
//! - Normalize the request target once, before routing and forwarding
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The ID lives in extensions only; forwarded headers stay verbatim
//! - Dot segments (`.`, `..`, `%2e%2e`) are resolved with the same URL parser
//!   the outbound client uses, so the routed path is the forwarded path

use axum::{
    body::Body,
    http::{uri::PathAndQuery, HeaderName, Request, Uri},
    middleware::Next,
    response::Response,
};
use url::Url;
use uuid::Uuid;

/// Placeholder authority used only to run a path through the URL parser.
const NORMALIZE_BASE: &str = "http://edge-router.invalid";

/// Header consulted for an upstream-assigned request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation ID attached to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh UUID v4 request ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Use the inbound `x-request-id` header if it is printable, otherwise generate one.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        req.headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access the request ID assigned by [`assign_request_id`].
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Middleware that stores a [`RequestId`] in the request extensions.
pub async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = RequestId::from_request(&req);
    req.extensions_mut().insert(id);
    next.run(req).await
}

/// Resolve dot segments in `path` the way a WHATWG URL parser does.
///
/// Returns `None` if the path does not parse.
pub fn normalize_path(path: &str) -> Option<String> {
    Url::parse(&format!("{}{}", NORMALIZE_BASE, path))
        .ok()
        .map(|url| url.path().to_string())
}

/// Rewrite the request target to its normalized path, dropping an empty query.
pub fn normalize_uri(uri: &Uri) -> Option<Uri> {
    let path = normalize_path(uri.path())?;
    let path_and_query = match uri.query().filter(|q| !q.is_empty()) {
        Some(q) => format!("{}?{}", path, q),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_inbound_header() {
        let req = Request::builder()
            .header("X-Request-Id", "abc-123")
            .body(())
            .unwrap();
        assert_eq!(RequestId::from_request(&req).as_str(), "abc-123");
    }

    #[test]
    fn generates_uuid_when_missing() {
        let req = Request::builder().body(()).unwrap();
        let id = RequestId::from_request(&req);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn dot_segments_are_resolved() {
        assert_eq!(normalize_path("/payments/../admin").as_deref(), Some("/admin"));
        assert_eq!(normalize_path("/payments/%2e%2e/admin").as_deref(), Some("/admin"));
        assert_eq!(normalize_path("/payments/%2E%2E/admin").as_deref(), Some("/admin"));
        assert_eq!(normalize_path("/payments/./x").as_deref(), Some("/payments/x"));
        assert_eq!(normalize_path("/../../etc").as_deref(), Some("/etc"));
    }

    #[test]
    fn ordinary_paths_are_kept() {
        for path in ["/", "/payments/invoice/42", "/a%20b", "//double", "/trailing/"] {
            assert_eq!(normalize_path(path).as_deref(), Some(path), "path {path}");
        }
    }

    #[test]
    fn normalized_uri_keeps_query_and_drops_empty_one() {
        let uri: Uri = "/payments/../grants?x=1&y=%2F".parse().unwrap();
        assert_eq!(normalize_uri(&uri).unwrap(), "/grants?x=1&y=%2F");

        let uri: Uri = "/payments/q?".parse().unwrap();
        let normalized = normalize_uri(&uri).unwrap();
        assert_eq!(normalized, "/payments/q");
        assert_eq!(normalized.query(), None);
    }

    #[test]
    fn extension_lookup() {
        let mut req = Request::builder().body(()).unwrap();
        assert!(req.request_id().is_none());

        req.extensions_mut().insert(RequestId::generate());
        assert!(req.request_id().is_some());
    }
}
