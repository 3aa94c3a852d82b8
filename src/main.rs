//! Edge request router.
//!
//! ```text
//!     Client Request ──▶ classify path ──▶ on allow-list? ──yes──▶ https://<target><path><query>
//!                                                │                          │
//!                                                no                  strip headers
//!                                                │                          │
//!                                                ▼                          ▼
//!                                          original origin ────────▶ Client Response
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_router::config::load_config;
use edge_router::http::HttpServer;
use edge_router::lifecycle::{shutdown_on_signal, Shutdown};
use edge_router::observability::init_logging;

#[derive(Parser)]
#[command(name = "edge-router")]
#[command(about = "Prefix-based edge router: proxy allow-listed paths, pass the rest through", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "edge-router.toml")]
    config: PathBuf,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!("edge-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
