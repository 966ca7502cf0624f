//! Shared utilities for daemon integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Notify};

use node_daemon::commands::{
    BuiltinCommands, CommandEnv, CommandError, CommandRequest, CommandRuntime,
};
use node_daemon::node::{Node, NodeError, NodeFactory, NodeOptions, PeerId};
use node_daemon::DaemonEvent;

/// Counts calls made against fake nodes.
#[derive(Debug, Default)]
pub struct NodeCounters {
    pub built: AtomicU32,
    pub started: AtomicU32,
    pub stopped: AtomicU32,
}

impl NodeCounters {
    pub fn built(&self) -> u32 {
        self.built.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> u32 {
        self.started.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> u32 {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// A node that binds nothing and reports its configured addresses verbatim.
pub struct FakeNode {
    peer_id: PeerId,
    addresses: Vec<String>,
    fail_start: bool,
    counters: Arc<NodeCounters>,
}

#[async_trait]
impl Node for FakeNode {
    fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    fn listen_addresses(&self) -> Vec<String> {
        self.addresses.clone()
    }

    async fn start(&mut self) -> Result<(), NodeError> {
        self.counters.started.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(NodeError::Custom("repo locked".into()));
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), NodeError> {
        self.counters.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeNodeFactory {
    pub counters: Arc<NodeCounters>,
    pub fail_start: bool,
}

impl FakeNodeFactory {
    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }
}

impl NodeFactory for FakeNodeFactory {
    type Node = FakeNode;

    fn build(&self, options: NodeOptions) -> Result<FakeNode, NodeError> {
        self.counters.built.fetch_add(1, Ordering::SeqCst);
        Ok(FakeNode {
            peer_id: PeerId::from("fake-peer"),
            addresses: options.listen_addresses,
            fail_start: self.fail_start,
            counters: self.counters.clone(),
        })
    }
}

/// Built-in commands plus a `stall` command that sleeps before answering.
pub struct StallingRuntime {
    pub stall: Duration,
    pub entered: Arc<Notify>,
}

impl StallingRuntime {
    pub fn new(stall: Duration) -> Self {
        Self {
            stall,
            entered: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl CommandRuntime for StallingRuntime {
    async fn execute(
        &self,
        env: &CommandEnv,
        request: CommandRequest,
    ) -> Result<Value, CommandError> {
        if request.path == "stall" {
            self.entered.notify_one();
            tokio::time::sleep(self.stall).await;
            return Ok(json!({ "StalledMs": self.stall.as_millis() as u64 }));
        }
        BuiltinCommands.execute(env, request).await
    }
}

/// Wait until something accepts connections on `addr`.
pub async fn wait_for_port(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("nothing listening on {}", addr);
}

/// Everything emitted so far, without waiting.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<DaemonEvent>) -> Vec<DaemonEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
