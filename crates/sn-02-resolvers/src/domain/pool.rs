//! In-memory data pools shared by processors and resolvers.

use serde::{Deserialize, Serialize};
use shared_types::{MetaHeader, MiniBlock, ShardHeader, Transaction};

use crate::domain::{BoundedCache, NonceHashIndex};

/// Pool capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub transactions: usize,
    pub mini_blocks: usize,
    pub shard_headers: usize,
    pub meta_headers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            transactions: 100_000,
            mini_blocks: 10_000,
            shard_headers: 1_000,
            meta_headers: 1_000,
        }
    }
}

pub struct DataPool {
    transactions: BoundedCache<Transaction>,
    mini_blocks: BoundedCache<MiniBlock>,
    shard_headers: BoundedCache<ShardHeader>,
    meta_headers: BoundedCache<MetaHeader>,
    shard_header_nonces: NonceHashIndex,
    meta_header_nonces: NonceHashIndex,
}

impl DataPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            transactions: BoundedCache::new(config.transactions),
            mini_blocks: BoundedCache::new(config.mini_blocks),
            shard_headers: BoundedCache::new(config.shard_headers),
            meta_headers: BoundedCache::new(config.meta_headers),
            shard_header_nonces: NonceHashIndex::new(),
            meta_header_nonces: NonceHashIndex::new(),
        }
    }

    pub fn transactions(&self) -> &BoundedCache<Transaction> {
        &self.transactions
    }

    pub fn mini_blocks(&self) -> &BoundedCache<MiniBlock> {
        &self.mini_blocks
    }

    pub fn shard_headers(&self) -> &BoundedCache<ShardHeader> {
        &self.shard_headers
    }

    pub fn meta_headers(&self) -> &BoundedCache<MetaHeader> {
        &self.meta_headers
    }

    /// Shard header nonces, keyed by the header's shard.
    pub fn shard_header_nonces(&self) -> &NonceHashIndex {
        &self.shard_header_nonces
    }

    /// Meta header nonces, keyed by `METACHAIN_SHARD_ID`.
    pub fn meta_header_nonces(&self) -> &NonceHashIndex {
        &self.meta_header_nonces
    }
}

impl Default for DataPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}
