//! Node facade.
//!
//! The daemon only needs a narrow view of the peer-to-peer node: an identity, the
//! addresses it is listening on, and `start`/`stop`. Everything behind that (swarm
//! membership, storage, protocols) lives behind the [`Node`] trait.
//!
//! # Data Flow
//! ```text
//! NodeOptions (resolved listen addresses)
//!     → NodeFactory::build (parse & validate, no sockets yet)
//!     → Node::start (bind listeners)
//!     → Node::peer_id / Node::listen_addresses (reported to the operator)
//!     → Node::stop (exactly once, on the single exit path)
//! ```

pub mod local;
pub mod multiaddr;

use std::fmt;
use std::net::SocketAddr;

use async_trait::async_trait;
use rand::RngCore;
use thiserror::Error;

use crate::net::listener::ListenerError;
use self::multiaddr::AddressError;

pub use local::{LocalNode, LocalNodeFactory};

/// Errors raised by a node facade.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("invalid listen address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("no listen addresses configured")]
    NoListenAddresses,

    #[error("max_connections must be greater than zero")]
    NoConnectionCapacity,

    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: ListenerError,
    },

    #[error("node is already running")]
    AlreadyRunning,

    #[error("node is not running")]
    NotRunning,

    #[error("{0}")]
    Custom(String),
}

/// Identity of a node on the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId(String);

impl PeerId {
    /// Generate a fresh random identity.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved construction options for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOptions {
    /// Addresses to listen on, as given by the operator.
    pub listen_addresses: Vec<String>,

    /// Maximum concurrent inbound connections per listener.
    pub max_connections: usize,
}

/// A running (or startable) peer-to-peer node.
#[async_trait]
pub trait Node: Send {
    /// The node's identity.
    fn peer_id(&self) -> &PeerId;

    /// Addresses the node is listening on, rendered as multiaddrs.
    fn listen_addresses(&self) -> Vec<String>;

    /// Bring the node online.
    async fn start(&mut self) -> Result<(), NodeError>;

    /// Take the node offline. May take as long as it needs.
    async fn stop(&mut self) -> Result<(), NodeError>;
}

/// Constructs nodes from resolved options.
pub trait NodeFactory: Send {
    type Node: Node + 'static;

    /// Construct a node. Must not acquire network resources.
    fn build(&self, options: NodeOptions) -> Result<Self::Node, NodeError>;
}
