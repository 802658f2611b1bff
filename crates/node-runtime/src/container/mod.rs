//! # Node Container
//!
//! Configuration and the component container of one node.

pub mod config;
pub mod node;

pub use config::{
    ConfigError, NodeConfig, NodeSection, ResolversConfig, ShardingConfig, TelemetrySection,
    ThrottlerConfig,
};
pub use node::{NodeError, ShardNode};
