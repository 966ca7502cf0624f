//! Fatal-fault escalation.
//!
//! The api server runs detached; nothing on the main path awaits its result. A fault
//! it cannot recover from is sent here instead, and whoever holds [`FatalFaults`]
//! (the orchestrator, and ultimately `main`) takes the process down.

use tokio::sync::mpsc;

use crate::error::DaemonError;

/// Create a connected sink / receiver pair.
pub fn fatal_channel() -> (FatalSink, FatalFaults) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FatalSink { tx }, FatalFaults { rx })
}

/// Reporting side, held by background tasks.
#[derive(Debug, Clone)]
pub struct FatalSink {
    tx: mpsc::UnboundedSender<DaemonError>,
}

impl FatalSink {
    /// Escalate a fault to the supervisor.
    pub fn escalate(&self, err: DaemonError) {
        tracing::error!(error = %err, "Escalating fatal fault");
        if self.tx.send(err).is_err() {
            tracing::error!("Supervisor is gone, fatal fault has no receiver");
        }
    }
}

/// Supervisor side.
#[derive(Debug)]
pub struct FatalFaults {
    rx: mpsc::UnboundedReceiver<DaemonError>,
}

impl FatalFaults {
    /// Next escalated fault, or `None` once every sink is gone.
    pub async fn recv(&mut self) -> Option<DaemonError> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_escalated_fault_reaches_supervisor() {
        let (sink, mut faults) = fatal_channel();
        sink.escalate(DaemonError::ServerFault(std::io::Error::other("boom")));

        let fault = faults.recv().await.unwrap();
        assert!(fault.is_fatal());
    }

    #[tokio::test]
    async fn test_channel_closes_with_last_sink() {
        let (sink, mut faults) = fatal_channel();
        drop(sink);
        assert!(faults.recv().await.is_none());
    }
}
