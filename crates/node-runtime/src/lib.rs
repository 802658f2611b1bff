//! # Node Runtime Library
//!
//! Wires the interceptor and resolver subsystems into a node and provides
//! the seednode used to bootstrap the network. The `seednode` binary is the
//! entry point in `main.rs`.
//!
//! ## Modules
//!
//! - `container/` - `NodeConfig` and `ShardNode` (component container)
//! - `adapters/` - pool-backed interceptor processors
//! - `seednode/` - seednode config, identity, TCP endpoint, status display

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod container;
pub mod seednode;

pub use container::{ConfigError, NodeConfig, NodeError, ShardNode};
