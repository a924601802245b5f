//! Network listener configuration.

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    #[serde(default = "default_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 6667))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_on_loopback_6667() {
        let config = ListenConfig::default();
        assert_eq!(config.address.to_string(), "127.0.0.1:6667");
    }
}
