//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection on a swarm address
//!     → listener.rs (accept loop, connection limits)
//!     → Hand off to the node's connection task
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - A connection slot is held for the lifetime of the connection task

pub mod listener;
