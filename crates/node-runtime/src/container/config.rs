//! # Node Configuration
//!
//! Unified configuration for the admission and recovery pipeline.
//!
//! ## Config File Format
//!
//! ```toml
//! [node]
//! port = 37373
//! seed = "seed"
//! chain_id = "shardnet"
//!
//! [sharding]
//! num_shards = 2
//! shard_id = 0          # 4294967295 for the metachain
//!
//! [throttler]
//! max_in_flight = 100
//!
//! [antiflood]
//! sweep_interval = 60000  # milliseconds, 0 disables the background sweep
//!
//! [antiflood.peer]
//! max_messages = 200
//! max_bytes = 2097152
//! window = 1000         # milliseconds
//!
//! [whitelist]
//! capacity = 50000
//! ttl = 300000          # milliseconds
//!
//! [resolvers]
//! num_peers_to_query = 2
//! ```
//!
//! Every section has a default, so an empty file is a valid config.
//! Environment variables override the file: `SN_PORT`, `SN_SEED`,
//! `SN_SHARD_ID` (a number or `META`), `SN_NUM_SHARDS`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_types::{ShardCoordinator, ShardId, METACHAIN_SHARD_ID};
use sn_01_interceptors::{AntifloodConfig, WhiteListConfig};
use sn_02_resolvers::PoolConfig;
use sn_telemetry::TelemetryConfig;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub node: NodeSection,
    pub sharding: ShardingConfig,
    pub throttler: ThrottlerConfig,
    pub antiflood: AntifloodConfig,
    pub whitelist: WhiteListConfig,
    pub resolvers: ResolversConfig,
    pub telemetry: TelemetrySection,
}

impl NodeConfig {
    /// Load from a TOML file and apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        let mut config = Self::parse(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `SN_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SN_PORT") {
            self.node.port = parse_env("SN_PORT", &value)?;
        }
        if let Some(value) = lookup("SN_SEED") {
            self.node.seed = value;
        }
        if let Some(value) = lookup("SN_NUM_SHARDS") {
            self.sharding.num_shards = parse_env("SN_NUM_SHARDS", &value)?;
        }
        if let Some(value) = lookup("SN_SHARD_ID") {
            self.sharding.shard_id = if value.eq_ignore_ascii_case("META") {
                METACHAIN_SHARD_ID
            } else {
                parse_env("SN_SHARD_ID", &value)?
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node.chain_id.is_empty() {
            return Err(ConfigError::Invalid("node.chain_id must not be empty".to_string()));
        }
        if self.throttler.max_in_flight == 0 {
            return Err(ConfigError::Invalid(
                "throttler.max_in_flight must be greater than zero".to_string(),
            ));
        }
        if self.resolvers.num_peers_to_query == 0 {
            return Err(ConfigError::Invalid(
                "resolvers.num_peers_to_query must be greater than zero".to_string(),
            ));
        }
        self.coordinator()?;
        Ok(())
    }

    pub fn coordinator(&self) -> Result<ShardCoordinator, ConfigError> {
        ShardCoordinator::new(self.sharding.num_shards, self.sharding.shard_id)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {error}")]
    Io { path: String, error: String },

    #[error("cannot parse config: {0}")]
    Parse(String),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSection {
    pub port: u16,
    /// Key-generation seed; empty means OS randomness.
    pub seed: String,
    pub chain_id: String,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            port: 37373,
            seed: String::new(),
            chain_id: "shardnet".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardingConfig {
    pub num_shards: u32,
    pub shard_id: ShardId,
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self {
            num_shards: 1,
            shard_id: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottlerConfig {
    /// Concurrent messages per interceptor or resolver.
    pub max_in_flight: u32,
}

impl Default for ThrottlerConfig {
    fn default() -> Self {
        Self { max_in_flight: 100 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolversConfig {
    pub num_peers_to_query: usize,
    pub pool: PoolConfig,
}

impl Default for ResolversConfig {
    fn default() -> Self {
        Self {
            num_peers_to_query: 2,
            pool: PoolConfig::default(),
        }
    }
}

/// File-level logging options; unset fields fall back to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySection {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

impl TelemetrySection {
    pub fn to_telemetry_config(&self, component: &str) -> TelemetryConfig {
        let mut config = TelemetryConfig::for_component(component);
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(json) = self.json_logs {
            config.json_logs = json;
        }
        config
    }
}
