//! Daemon error taxonomy.
//!
//! # Propagation
//! ```text
//! Configuration / NodeStart  → returned to the caller, nothing left running
//! ServerFault                → fatal channel → process abort
//! ServerDrain / ShutdownTimeout / NodeStop
//!                            → recorded in ShutdownOutcome, never escalated
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::node::NodeError;

/// Errors produced by a daemon run.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Invalid inputs, detected before any resource was acquired.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Node construction or start failed.
    #[error("failed to start node: {0}")]
    NodeStart(#[source] NodeError),

    /// The command server stopped without being asked to.
    #[error("api server fault: {0}")]
    ServerFault(#[source] std::io::Error),

    /// The server failed after a shutdown was requested.
    #[error("api server failed while draining: {0}")]
    ServerDrain(#[source] std::io::Error),

    /// The server did not drain within the shutdown bound.
    #[error("api server did not drain within {0:?}")]
    ShutdownTimeout(Duration),

    /// Node teardown failed.
    #[error("failed to stop node: {0}")]
    NodeStop(#[source] NodeError),
}

impl DaemonError {
    /// Whether this error must take the whole process down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DaemonError::ServerFault(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unrequested_server_faults_are_fatal() {
        assert!(DaemonError::ServerFault(std::io::Error::other("gone")).is_fatal());
        assert!(!DaemonError::ServerDrain(std::io::Error::other("gone")).is_fatal());
        assert!(!DaemonError::ShutdownTimeout(Duration::from_secs(5)).is_fatal());
        assert!(!DaemonError::Configuration("bad".into()).is_fatal());
    }
}
