//! Daemon orchestrator.
//!
//! # State Machine
//! ```text
//! Idle → Configuring → NodeStarting → Serving → ShuttingDown → Stopped
//!            │              │            │
//!            └──────────────┴────────────┴──→ Aborted
//! ```
//!
//! - Configuring: validate inputs, resolve node options, construct the node
//! - NodeStarting: start the node, report identity and listen addresses
//! - Serving: api server launched, waiting for an interrupt
//! - ShuttingDown: bounded server drain, then node stop
//! - Aborted: construction/start failure, or a fatal api server fault
//!
//! A [`Daemon`] is consumed by [`Daemon::run`]; every resource it creates is released
//! before `run` returns.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::commands::{BuiltinCommands, CommandEnv, CommandRuntime};
use crate::config::{DaemonConfig, NodeConfig};
use crate::error::DaemonError;
use crate::http::CommandServer;
use crate::lifecycle::startup::resolve_node_options;
use crate::lifecycle::{fatal_channel, Interrupts, ShutdownOutcome, ShutdownSequencer};
use crate::node::{Node, NodeError, NodeFactory};

/// Lifecycle state of a daemon run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    Idle,
    Configuring,
    NodeStarting,
    Serving,
    ShuttingDown,
    Stopped,
    Aborted,
}

impl DaemonState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DaemonState::Stopped | DaemonState::Aborted)
    }
}

impl fmt::Display for DaemonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DaemonState::Idle => "idle",
            DaemonState::Configuring => "configuring",
            DaemonState::NodeStarting => "node-starting",
            DaemonState::Serving => "serving",
            DaemonState::ShuttingDown => "shutting-down",
            DaemonState::Stopped => "stopped",
            DaemonState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Operator-facing progress reported by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonEvent {
    PeerId(String),
    ListenAddress(String),
    Interrupted,
    ServerShutdownFailed(String),
}

impl fmt::Display for DaemonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonEvent::PeerId(id) => write!(f, "My peer ID is {}", id),
            DaemonEvent::ListenAddress(addr) => write!(f, "Swarm listening on: {}", addr),
            DaemonEvent::Interrupted => write!(f, "Got interrupt, shutting down..."),
            DaemonEvent::ServerShutdownFailed(e) => {
                write!(f, "failed to shut down api server: {}", e)
            }
        }
    }
}

/// Runs one node and its command api from startup to shutdown.
pub struct Daemon<F: NodeFactory> {
    node_config: NodeConfig,
    config: DaemonConfig,
    factory: F,
    runtime: Arc<dyn CommandRuntime>,
    interrupts: Interrupts,
    events: mpsc::UnboundedSender<DaemonEvent>,
    sequencer: ShutdownSequencer,
    state: watch::Sender<DaemonState>,
}

impl<F: NodeFactory> Daemon<F> {
    pub fn new(
        node_config: NodeConfig,
        config: DaemonConfig,
        factory: F,
        interrupts: Interrupts,
        events: mpsc::UnboundedSender<DaemonEvent>,
    ) -> Self {
        let (state, _) = watch::channel(DaemonState::Idle);
        Self {
            node_config,
            config,
            factory,
            runtime: Arc::new(BuiltinCommands),
            interrupts,
            events,
            sequencer: ShutdownSequencer::default(),
            state,
        }
    }

    /// Serve commands with `runtime` instead of the built-in set.
    pub fn with_runtime(mut self, runtime: Arc<dyn CommandRuntime>) -> Self {
        self.runtime = runtime;
        self
    }

    /// Override the api server drain bound (defaults to `SHUTDOWN_TIMEOUT`).
    pub fn with_shutdown_timeout(mut self, bound: Duration) -> Self {
        self.sequencer = ShutdownSequencer::new(bound);
        self
    }

    /// Observe state transitions.
    pub fn state(&self) -> watch::Receiver<DaemonState> {
        self.state.subscribe()
    }

    /// Run until an interrupt has been handled.
    ///
    /// Returns the shutdown diagnostics on a normal stop. Errors are either pre-serving
    /// failures, after which nothing is left running, or a fatal server fault, which
    /// callers must treat as process-ending.
    pub async fn run(mut self) -> Result<ShutdownOutcome, DaemonError> {
        self.transition(DaemonState::Configuring);
        let options = match resolve_node_options(&self.node_config, &self.config) {
            Ok(options) => options,
            Err(e) => return Err(self.abort(e)),
        };

        let mut node = match self.factory.build(options) {
            Ok(node) => node,
            Err(e) => return Err(self.abort(classify_build_error(e))),
        };

        self.transition(DaemonState::NodeStarting);
        if let Err(e) = node.start().await {
            return Err(self.abort(DaemonError::NodeStart(e)));
        }

        let peer_id = node.peer_id().to_string();
        let listen_addresses = node.listen_addresses();
        self.emit(DaemonEvent::PeerId(peer_id.clone()));
        for addr in &listen_addresses {
            self.emit(DaemonEvent::ListenAddress(addr.clone()));
        }

        let env = CommandEnv {
            peer_id,
            listen_addresses,
            version: env!("CARGO_PKG_VERSION"),
        };
        let (fatal, mut faults) = fatal_channel();
        let server = CommandServer::new(self.runtime.clone(), env, &self.config.api_bind_address)
            .launch(fatal);

        self.interrupts.arm();
        self.transition(DaemonState::Serving);

        let fault = tokio::select! {
            _ = self.interrupts.recv() => None,
            Some(fault) = faults.recv() => Some(fault),
        };
        if let Some(fault) = fault {
            return Err(self.abort(fault));
        }

        self.emit(DaemonEvent::Interrupted);
        self.transition(DaemonState::ShuttingDown);

        let outcome = self.sequencer.run(server.shutdown(), node.stop()).await;
        if let Some(e) = &outcome.server_shutdown_error {
            self.emit(DaemonEvent::ServerShutdownFailed(e.to_string()));
        }

        self.transition(DaemonState::Stopped);
        Ok(outcome)
    }

    fn transition(&self, next: DaemonState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = %previous, to = %next, "Daemon state transition");
    }

    fn abort(&self, err: DaemonError) -> DaemonError {
        let state = *self.state.borrow();
        tracing::error!(error = %err, state = %state, "Daemon aborted");
        self.transition(DaemonState::Aborted);
        err
    }

    fn emit(&self, event: DaemonEvent) {
        tracing::info!(event = %event, "Daemon progress");
        let _ = self.events.send(event);
    }
}

/// Bad options are configuration errors; anything else failed the node itself.
fn classify_build_error(err: NodeError) -> DaemonError {
    match err {
        NodeError::InvalidAddress(_)
        | NodeError::NoListenAddresses
        | NodeError::NoConnectionCapacity => DaemonError::Configuration(err.to_string()),
        other => DaemonError::NodeStart(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lines() {
        assert_eq!(
            DaemonEvent::PeerId("abc".into()).to_string(),
            "My peer ID is abc"
        );
        assert_eq!(
            DaemonEvent::ListenAddress("/ip4/127.0.0.1/tcp/6000".into()).to_string(),
            "Swarm listening on: /ip4/127.0.0.1/tcp/6000"
        );
        assert_eq!(
            DaemonEvent::Interrupted.to_string(),
            "Got interrupt, shutting down..."
        );
    }

    #[test]
    fn test_build_errors_are_classified() {
        assert!(matches!(
            classify_build_error(NodeError::NoListenAddresses),
            DaemonError::Configuration(_)
        ));
        assert!(matches!(
            classify_build_error(NodeError::Custom("keystore locked".into())),
            DaemonError::NodeStart(_)
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(DaemonState::Stopped.is_terminal());
        assert!(DaemonState::Aborted.is_terminal());
        assert!(!DaemonState::Serving.is_terminal());
    }
}
