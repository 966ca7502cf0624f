//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or nothing for an in-memory default
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → NodeConfig (validated, immutable)
//!     → CLI overrides (--api, --swarmlisten)
//!     → DaemonConfig handed to the orchestrator
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The swarm listen override replaces the configured addresses, never merges

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ApiConfig;
pub use schema::DaemonConfig;
pub use schema::NodeConfig;
pub use schema::ObservabilityConfig;
pub use schema::SwarmConfig;
