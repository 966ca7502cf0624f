//! Configuration schema definitions.
//!
//! `NodeConfig` is the repository configuration read from disk. `DaemonConfig` is
//! what a single daemon run actually consumes after CLI overrides are applied.

use serde::{Deserialize, Serialize};

/// Root configuration for a node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NodeConfig {
    /// Command API settings.
    pub api: ApiConfig,

    /// Peer-to-peer swarm settings.
    pub swarm: SwarmConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Command API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the command server (e.g., "127.0.0.1:3453").
    pub address: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3453".to_string(),
        }
    }
}

/// Swarm configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Default listen addresses, multiaddr (`/ip4/0.0.0.0/tcp/6000`) or `host:port`.
    pub listen_addresses: Vec<String>,

    /// Maximum concurrent inbound connections per listener (backpressure).
    pub max_connections: usize,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            listen_addresses: vec!["/ip4/0.0.0.0/tcp/6000".to_string()],
            max_connections: 1_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Inputs of a single daemon run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Address the command server binds to.
    pub api_bind_address: String,

    /// Replaces the node's default listen addresses for this run when set.
    pub swarm_listen_override: Option<String>,
}

impl DaemonConfig {
    /// Build the run configuration from the node config and optional CLI overrides.
    pub fn from_node_config(
        config: &NodeConfig,
        api_override: Option<String>,
        swarm_listen_override: Option<String>,
    ) -> Self {
        Self {
            api_bind_address: api_override.unwrap_or_else(|| config.api.address.clone()),
            swarm_listen_override,
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self::from_node_config(&NodeConfig::default(), None, None)
    }
}
