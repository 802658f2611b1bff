//! Seednode P2P configuration.
//!
//! ```toml
//! [node]
//! port = 10000
//! seed = "seed"
//!
//! [kad_dht_peer_discovery]
//! enabled = true
//! refresh_interval_ms = 10000
//! bootstrap_peers = ["127.0.0.1:10001"]
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::container::ConfigError;
use crate::seednode::SeedNodeError;

pub const DEFAULT_P2P_CONFIG: &str = "./config/p2p.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct P2pConfig {
    pub node: P2pNodeConfig,
    pub kad_dht_peer_discovery: KadDhtConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct P2pNodeConfig {
    pub port: u16,
    pub seed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KadDhtConfig {
    pub enabled: bool,
    pub refresh_interval_ms: u64,
    pub bootstrap_peers: Vec<String>,
}

impl Default for KadDhtConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            refresh_interval_ms: 10_000,
            bootstrap_peers: Vec::new(),
        }
    }
}

impl P2pConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Seednodes require a usable port and kad-dht discovery.
    pub fn validate(&self) -> Result<(), SeedNodeError> {
        if self.node.port == 0 {
            return Err(SeedNodeError::InvalidPort);
        }
        if !self.kad_dht_peer_discovery.enabled {
            return Err(SeedNodeError::DiscoveryDisabled);
        }
        self.bootstrap_peers()?;
        Ok(())
    }

    pub fn bootstrap_peers(&self) -> Result<Vec<SocketAddr>, SeedNodeError> {
        self.kad_dht_peer_discovery
            .bootstrap_peers
            .iter()
            .map(|peer| {
                peer.parse()
                    .map_err(|_| SeedNodeError::InvalidBootstrapPeer(peer.clone()))
            })
            .collect()
    }
}
