//! Stop signal shared between the signal task and the HTTP server.

use tokio::sync::broadcast;

/// One-shot broadcast that tells the server to stop accepting and drain.
///
/// `main` hands a clone to the signal task and a receiver to
/// [`HttpServer::run`](crate::http::HttpServer::run); tests trigger it
/// directly to tear a router down.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver that resolves once [`Shutdown::trigger`] is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every server holding a receiver to drain. No-op if none are left.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Servers still waiting on this signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
