//! Peer-to-peer node daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   config (file + CLI overrides)
//!         │
//!         ▼
//!   ┌──────────────────────────── daemon ────────────────────────────┐
//!   │  Configuring → NodeStarting → Serving → ShuttingDown → Stopped │
//!   └──────┬──────────────┬────────────┬───────────────┬─────────────┘
//!          │              │            │               │
//!          ▼              ▼            ▼               ▼
//!     lifecycle::     node::Node   http::Command   lifecycle::
//!     startup         (swarm       Server ──▶      ShutdownSequencer
//!                     listeners)   commands::      (bounded drain,
//!                                  CommandRuntime   then node stop)
//!
//!   lifecycle::signals ──interrupt──▶ daemon ◀──fatal fault── lifecycle::supervisor
//! ```

pub mod commands;
pub mod config;
pub mod daemon;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod node;
pub mod observability;

pub use config::{DaemonConfig, NodeConfig};
pub use daemon::{Daemon, DaemonEvent, DaemonState};
pub use error::DaemonError;
pub use lifecycle::{Interrupts, ShutdownOutcome, SHUTDOWN_TIMEOUT};
pub use node::{LocalNodeFactory, Node, NodeFactory};
