//! Shutdown coordination.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::error::DaemonError;
use crate::node::NodeError;
use crate::observability::metrics;

/// How long the api server gets to drain in-flight requests.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that long-running tasks can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnostics collected while tearing the daemon down.
///
/// Neither field changes the result of the run.
#[derive(Debug, Default)]
pub struct ShutdownOutcome {
    pub server_shutdown_error: Option<DaemonError>,
    pub node_stop_error: Option<DaemonError>,
}

impl ShutdownOutcome {
    /// True when both teardown steps finished without a diagnostic.
    pub fn is_clean(&self) -> bool {
        self.server_shutdown_error.is_none() && self.node_stop_error.is_none()
    }

    /// True when the server drain hit the shutdown bound.
    pub fn timed_out(&self) -> bool {
        matches!(self.server_shutdown_error, Some(DaemonError::ShutdownTimeout(_)))
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &DaemonError> {
        self.server_shutdown_error
            .iter()
            .chain(self.node_stop_error.iter())
    }
}

/// Two-step teardown: bounded server drain, then unbounded node stop.
#[derive(Debug, Clone, Copy)]
pub struct ShutdownSequencer {
    bound: Duration,
}

impl ShutdownSequencer {
    pub fn new(bound: Duration) -> Self {
        Self { bound }
    }

    /// Drain the server within the bound, then stop the node.
    ///
    /// `stop` is not polled until the drain has finished or timed out, and it is
    /// always polled to completion.
    pub async fn run<D, S>(&self, drain: D, stop: S) -> ShutdownOutcome
    where
        D: Future<Output = Result<(), DaemonError>>,
        S: Future<Output = Result<(), NodeError>>,
    {
        let mut outcome = ShutdownOutcome::default();

        match time::timeout(self.bound, drain).await {
            Ok(Ok(())) => {
                tracing::info!("API server drained");
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "API server shutdown failed");
                outcome.server_shutdown_error = Some(e);
            }
            Err(_) => {
                tracing::warn!(
                    bound_ms = self.bound.as_millis() as u64,
                    "API server did not drain in time, abandoning wait"
                );
                metrics::record_shutdown_timeout();
                outcome.server_shutdown_error = Some(DaemonError::ShutdownTimeout(self.bound));
            }
        }

        if let Err(e) = stop.await {
            tracing::warn!(error = %e, "Node stop failed");
            outcome.node_stop_error = Some(DaemonError::NodeStop(e));
        } else {
            tracing::info!("Node stopped");
        }

        outcome
    }
}

impl Default for ShutdownSequencer {
    fn default() -> Self {
        Self::new(SHUTDOWN_TIMEOUT)
    }
}
