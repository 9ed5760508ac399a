//! Route revalidation bus
//!
//! Content mutations publish the route paths whose rendered output is now
//! stale. Whatever renders pages (an SSR front end, a CDN purger) subscribes
//! and drops its cached copy of each path it receives.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// Cloneable handle publishing stale route paths
#[derive(Debug, Clone)]
pub struct Revalidator {
    sender: broadcast::Sender<String>,
}

impl Default for Revalidator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Revalidator {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Mark `path` stale. Having no subscribers is not an error.
    pub fn revalidate(&self, path: impl Into<String>) {
        let path = path.into();
        tracing::debug!(path = %path, "Revalidating route");
        let _ = self.sender.send(path);
    }

    pub fn revalidate_all<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        for path in paths {
            self.revalidate(path);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

/// Log every stale path until all publishers are gone.
///
/// Returns how many paths were received.
pub async fn log_stale_routes(mut rx: broadcast::Receiver<String>) -> u64 {
    let mut received = 0;
    loop {
        match rx.recv().await {
            Ok(path) => {
                received += 1;
                tracing::info!(path = %path, "Route marked stale");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Revalidation log fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    received
}
