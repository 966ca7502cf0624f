//! Listen address parsing.
//!
//! Accepts the two shapes operators actually type: multiaddrs of the form
//! `/ip4/<ip>/tcp/<port>` or `/ip6/<ip>/tcp/<port>`, and plain `host:port`.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("'{0}' is not a supported multiaddr (expected /ip4|ip6/<ip>/tcp/<port>)")]
    UnsupportedMultiaddr(String),

    #[error("'{0}' has an invalid ip component")]
    InvalidIp(String),

    #[error("'{0}' has an invalid tcp port")]
    InvalidPort(String),

    #[error("'{0}' is neither a multiaddr nor a socket address")]
    Unrecognized(String),
}

/// Parse a listen address into a socket address.
pub fn parse_listen_address(input: &str) -> Result<SocketAddr, AddressError> {
    let input = input.trim();
    if !input.starts_with('/') {
        return input
            .parse::<SocketAddr>()
            .map_err(|_| AddressError::Unrecognized(input.to_string()));
    }

    let parts: Vec<&str> = input.split('/').skip(1).collect();
    let [proto, ip, transport, port] = parts.as_slice() else {
        return Err(AddressError::UnsupportedMultiaddr(input.to_string()));
    };
    if *transport != "tcp" {
        return Err(AddressError::UnsupportedMultiaddr(input.to_string()));
    }

    let ip: IpAddr = match *proto {
        "ip4" => ip
            .parse::<std::net::Ipv4Addr>()
            .map(IpAddr::V4)
            .map_err(|_| AddressError::InvalidIp(input.to_string()))?,
        "ip6" => ip
            .parse::<std::net::Ipv6Addr>()
            .map(IpAddr::V6)
            .map_err(|_| AddressError::InvalidIp(input.to_string()))?,
        _ => return Err(AddressError::UnsupportedMultiaddr(input.to_string())),
    };
    let port: u16 = port
        .parse()
        .map_err(|_| AddressError::InvalidPort(input.to_string()))?;

    Ok(SocketAddr::new(ip, port))
}

/// Render a socket address as a tcp multiaddr.
pub fn to_multiaddr(addr: &SocketAddr) -> String {
    match addr.ip() {
        IpAddr::V4(ip) => format!("/ip4/{}/tcp/{}", ip, addr.port()),
        IpAddr::V6(ip) => format!("/ip6/{}/tcp/{}", ip, addr.port()),
    }
}
