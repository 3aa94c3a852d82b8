//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    response::Response,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use edge_router::config::{ProxyConfig, UpstreamScheme};
use edge_router::{HttpServer, Shutdown};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A running mock backend and everything it has received.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a mock backend that records requests and answers with fixed headers.
///
/// Every response carries `x-backend: <name>`, `X-Frame-Options`,
/// `Content-Security-Policy`, `Content-Type` and two `x-dup` values. A path
/// ending in `/redirect` answers `302` instead of `200`.
pub async fn start_mock_backend(name: &'static str) -> MockBackend {
    start_slow_backend(name, Duration::ZERO).await
}

/// Like [`start_mock_backend`], but waits `delay` before answering.
pub async fn start_slow_backend(name: &'static str, delay: Duration) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let recorded = requests.clone();
    let app = Router::new().fallback(move |req: Request<Body>| {
        let recorded = recorded.clone();
        async move {
            let (parts, body) = req.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
            let redirect = parts.uri.path().ends_with("/redirect");
            recorded.lock().unwrap().push(Recorded {
                method: parts.method,
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body,
            });

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let status = if redirect { StatusCode::FOUND } else { StatusCode::OK };
            Response::builder()
                .status(status)
                .header("x-backend", name)
                .header("X-Frame-Options", "DENY")
                .header("Content-Security-Policy", "default-src 'self'")
                .header("Content-Type", "text/html")
                .header("x-dup", "1")
                .header("x-dup", "2")
                .header("location", "/elsewhere")
                .body(Body::from(name))
                .unwrap()
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { addr, requests }
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Router config pointing at local plaintext backends.
pub fn router_config(
    target: SocketAddr,
    origin: SocketAddr,
    routes: &[&str],
    strip: &[&str],
) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.proxy.target = target.to_string();
    config.proxy.scheme = UpstreamScheme::Http;
    config.proxy.routes = routes.iter().map(|r| r.to_string()).collect();
    config.proxy.strip_response_headers = strip.iter().map(|h| h.to_string()).collect();
    config.passthrough.origin = format!("http://{}", origin);
    config
}

/// Start the router on an ephemeral port.
pub async fn start_router(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Test client that neither uses system proxies nor follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Send a raw HTTP/1.1 GET with `target` exactly as written and return the
/// response head and body. Bypasses client-side URL normalization.
#[allow(dead_code)]
pub async fn raw_get(addr: SocketAddr, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        target, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).to_lowercase()
}
