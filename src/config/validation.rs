//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses (API bind address, swarm listen addresses)
//! - Validate value ranges (connection limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: NodeConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{DaemonConfig, NodeConfig};
use crate::node::multiaddr::parse_listen_address;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded node configuration.
pub fn validate_config(config: &NodeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_api_address(&config.api.address) {
        errors.push(ValidationError::new("api.address", e));
    }

    if config.swarm.listen_addresses.is_empty() {
        errors.push(ValidationError::new(
            "swarm.listen_addresses",
            "at least one listen address is required",
        ));
    }
    for addr in &config.swarm.listen_addresses {
        if let Err(e) = parse_listen_address(addr) {
            errors.push(ValidationError::new("swarm.listen_addresses", e.to_string()));
        }
    }

    if config.swarm.max_connections == 0 {
        errors.push(ValidationError::new(
            "swarm.max_connections",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the inputs of a daemon run.
pub fn validate_daemon_config(config: &DaemonConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_api_address(&config.api_bind_address) {
        errors.push(ValidationError::new("api_bind_address", e));
    }
    if let Some(addr) = &config.swarm_listen_override {
        if let Err(e) = parse_listen_address(addr) {
            errors.push(ValidationError::new("swarm_listen_override", e.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_api_address(addr: &str) -> Result<(), String> {
    api_listen_target(addr).map(|_| ())
}

/// Normalise an api address into a target `TcpListener::bind` accepts.
///
/// Takes `ip:port`, `[ipv6]:port`, `hostname:port`, or `:port` for all interfaces.
/// Hostnames are only checked for shape; resolution happens at bind time.
pub fn api_listen_target(addr: &str) -> Result<String, String> {
    if addr.parse::<SocketAddr>().is_ok() {
        return Ok(addr.to_string());
    }

    let invalid = || format!("'{}' is not a bindable host:port address", addr);
    let (host, port) = addr.rsplit_once(':').ok_or_else(invalid)?;
    let port: u16 = port.parse().map_err(|_| invalid())?;

    if host.is_empty() {
        return Ok(format!("0.0.0.0:{}", port));
    }
    if is_hostname(host) {
        Ok(format!("{}:{}", host, port))
    } else {
        Err(invalid())
    }
}

fn is_hostname(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    // All-numeric labels would be a malformed IPv4 literal, not a name.
    if labels.iter().all(|l| l.chars().all(|c| c.is_ascii_digit())) {
        return false;
    }
    host.len() <= 253
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&NodeConfig::default()).is_ok());
        assert!(validate_daemon_config(&DaemonConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = NodeConfig::default();
        config.api.address = "localhost".into();
        config.swarm.listen_addresses = vec!["/dns/example.com/tcp/1".into()];
        config.swarm.max_connections = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["api.address", "swarm.listen_addresses", "swarm.max_connections"]
        );
    }

    #[test]
    fn test_api_address_forms() {
        assert_eq!(api_listen_target("127.0.0.1:3453").unwrap(), "127.0.0.1:3453");
        assert_eq!(api_listen_target("[::1]:3453").unwrap(), "[::1]:3453");
        assert_eq!(api_listen_target("localhost:3453").unwrap(), "localhost:3453");
        assert_eq!(api_listen_target("node-1.lan:80").unwrap(), "node-1.lan:80");
        assert_eq!(api_listen_target(":3453").unwrap(), "0.0.0.0:3453");

        for bad in [
            "localhost",
            "127.0.0.1:99999",
            "300.0.0.1:80",
            "::1:3453",
            "bad host:80",
            "-edge.lan:80",
            "127.0.0.1:",
        ] {
            assert!(api_listen_target(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[tokio::test]
    async fn test_accepted_hostname_actually_binds() {
        let target = api_listen_target("localhost:0").unwrap();
        assert!(validate_daemon_config(&DaemonConfig {
            api_bind_address: "localhost:0".into(),
            swarm_listen_override: None,
        })
        .is_ok());
        tokio::net::TcpListener::bind(target).await.unwrap();
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let config = DaemonConfig {
            api_bind_address: "127.0.0.1:0".into(),
            swarm_listen_override: Some("/ip4/300.0.0.1/tcp/1".into()),
        };

        let errors = validate_daemon_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "swarm_listen_override");
    }
}
