//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     DaemonConfig → Validate → Resolve NodeOptions (override replaces defaults)
//!
//! Signals (signals.rs):
//!     SIGINT / Ctrl+C or injected trigger → single-slot mailbox → orchestrator
//!
//! Supervisor (supervisor.rs):
//!     Detached server task fault → fatal channel → orchestrator → process abort
//!
//! Shutdown (shutdown.rs):
//!     Interrupt → Drain api server (bounded) → Stop node (unbounded) → Stopped
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then node, then the api server
//! - Ordered shutdown: server drain always precedes node stop
//! - Only the server drain has a deadline; node teardown is trusted

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::{Shutdown, ShutdownOutcome, ShutdownSequencer, SHUTDOWN_TIMEOUT};
pub use signals::{InterruptTrigger, Interrupts};
pub use supervisor::{fatal_channel, FatalFaults, FatalSink};
