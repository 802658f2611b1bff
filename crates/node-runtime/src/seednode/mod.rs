//! # Seednode
//!
//! A bootstrap endpoint other nodes dial to join the network. It holds a
//! secp256k1 identity, listens on a TCP port and reports who is connected.
//!
//! With `[node] seed` set, the identity is derived from `sha256(seed)` and
//! is stable across restarts; otherwise it comes from OS randomness.

pub mod config;
pub mod display;
pub mod messenger;
pub mod rng;

pub use config::{KadDhtConfig, P2pConfig, P2pNodeConfig, DEFAULT_P2P_CONFIG};
pub use display::{render_status, render_table};
pub use messenger::SeedMessenger;
pub use rng::SeedRandReader;

use thiserror::Error;

use crate::container::ConfigError;

#[derive(Debug, Error)]
pub enum SeedNodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot start node on port 0")]
    InvalidPort,

    #[error("kad-dht peer discovery should have been enabled")]
    DiscoveryDisabled,

    #[error("invalid bootstrap peer address: {0}")]
    InvalidBootstrapPeer(String),

    #[error("empty seed")]
    EmptySeed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
