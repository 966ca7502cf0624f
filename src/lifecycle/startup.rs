//! Startup orchestration helpers.
//!
//! # Responsibilities
//! - Validate the inputs of a daemon run
//! - Resolve node construction options, applying the listen override
//!
//! # Design Decisions
//! - Fail fast: nothing is constructed when inputs are invalid
//! - The listen override replaces the configured addresses for the run; no merge

use crate::config::validation::validate_daemon_config;
use crate::config::{DaemonConfig, NodeConfig};
use crate::error::DaemonError;
use crate::node::NodeOptions;

/// Resolve node construction options for a run.
pub fn resolve_node_options(
    config: &NodeConfig,
    daemon: &DaemonConfig,
) -> Result<NodeOptions, DaemonError> {
    validate_daemon_config(daemon).map_err(|errors| {
        DaemonError::Configuration(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )
    })?;

    let listen_addresses = match &daemon.swarm_listen_override {
        Some(addr) => vec![addr.clone()],
        None => config.swarm.listen_addresses.clone(),
    };

    if listen_addresses.is_empty() {
        return Err(DaemonError::Configuration(
            "no swarm listen addresses configured".to_string(),
        ));
    }

    tracing::debug!(
        listen_addresses = ?listen_addresses,
        overridden = daemon.swarm_listen_override.is_some(),
        "Node options resolved"
    );

    Ok(NodeOptions {
        listen_addresses,
        max_connections: config.swarm.max_connections,
    })
}
