//! In-process node backed by plain TCP swarm listeners.
//!
//! # Responsibilities
//! - Own a generated peer identity
//! - Bind one bounded listener per listen address on start
//! - Accept inbound connections until stopped
//!
//! Protocol handling is not done here: accepted connections are held open until the
//! peer hangs up or the node stops.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::net::listener::Listener;
use crate::node::multiaddr::{parse_listen_address, to_multiaddr};
use crate::node::{Node, NodeError, NodeFactory, NodeOptions, PeerId};

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Builds [`LocalNode`]s.
#[derive(Debug, Clone, Default)]
pub struct LocalNodeFactory;

impl NodeFactory for LocalNodeFactory {
    type Node = LocalNode;

    fn build(&self, options: NodeOptions) -> Result<LocalNode, NodeError> {
        LocalNode::new(PeerId::random(), options)
    }
}

struct Running {
    shutdown: Shutdown,
    bound: Vec<SocketAddr>,
    tasks: Vec<JoinHandle<()>>,
}

/// A node listening on local TCP sockets.
pub struct LocalNode {
    peer_id: PeerId,
    addresses: Vec<SocketAddr>,
    max_connections: usize,
    running: Option<Running>,
}

impl LocalNode {
    /// Construct a node. Listen addresses are parsed here; nothing is bound yet.
    pub fn new(peer_id: PeerId, options: NodeOptions) -> Result<Self, NodeError> {
        if options.listen_addresses.is_empty() {
            return Err(NodeError::NoListenAddresses);
        }
        if options.max_connections == 0 {
            return Err(NodeError::NoConnectionCapacity);
        }

        let addresses = options
            .listen_addresses
            .iter()
            .map(|addr| parse_listen_address(addr))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            peer_id,
            addresses,
            max_connections: options.max_connections,
            running: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Socket addresses actually bound, empty while stopped.
    pub fn bound_addresses(&self) -> &[SocketAddr] {
        self.running
            .as_ref()
            .map(|r| r.bound.as_slice())
            .unwrap_or(&[])
    }
}

#[async_trait]
impl Node for LocalNode {
    fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    fn listen_addresses(&self) -> Vec<String> {
        match &self.running {
            Some(running) => running.bound.iter().map(to_multiaddr).collect(),
            None => self.addresses.iter().map(to_multiaddr).collect(),
        }
    }

    async fn start(&mut self) -> Result<(), NodeError> {
        if self.running.is_some() {
            return Err(NodeError::AlreadyRunning);
        }

        // Bind everything before spawning anything so a failure leaves nothing behind.
        let mut listeners = Vec::with_capacity(self.addresses.len());
        for addr in &self.addresses {
            let listener = Listener::bind(*addr, self.max_connections)
                .await
                .map_err(|source| NodeError::Bind { addr: *addr, source })?;
            listeners.push(listener);
        }

        let shutdown = Shutdown::new();
        let mut bound = Vec::with_capacity(listeners.len());
        let mut tasks = Vec::with_capacity(listeners.len());
        for listener in listeners {
            bound.push(listener.local_addr());
            tasks.push(tokio::spawn(accept_loop(listener, shutdown.subscribe())));
        }

        tracing::info!(peer_id = %self.peer_id, listeners = bound.len(), "Node started");
        self.running = Some(Running {
            shutdown,
            bound,
            tasks,
        });
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), NodeError> {
        let running = self.running.take().ok_or(NodeError::NotRunning)?;

        running.shutdown.trigger();
        for task in running.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Swarm accept loop ended abnormally");
            }
        }

        tracing::info!(peer_id = %self.peer_id, "Node stopped");
        Ok(())
    }
}

async fn accept_loop(listener: Listener, mut shutdown: broadcast::Receiver<()>) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((mut stream, peer_addr, permit)) => {
                        let mut conn_shutdown = shutdown.resubscribe();
                        tokio::spawn(async move {
                            let _permit = permit;
                            let mut sink = tokio::io::sink();
                            tokio::select! {
                                _ = tokio::io::copy(&mut stream, &mut sink) => {}
                                _ = conn_shutdown.recv() => {}
                            }
                            tracing::debug!(peer_addr = %peer_addr, "Swarm connection closed");
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Swarm accept failed");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }
            _ = shutdown.recv() => {
                break;
            }
        }
    }
}
