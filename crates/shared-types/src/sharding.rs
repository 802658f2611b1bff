//! # Shard Coordinator
//!
//! Maps addresses to shards and names the communication channel between
//! two shards. Topic suffixes produced here are part of the wire protocol:
//! both ends of a channel must derive the same identifier.

use crate::entities::{ShardId, METACHAIN_SHARD_ID};
use crate::errors::ShardingError;

/// Number of trailing address bytes used to pick the shard.
const ADDRESS_SUFFIX_LEN: usize = 4;

/// Shard layout as seen from one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardCoordinator {
    num_shards: u32,
    self_id: ShardId,
    mask_high: u32,
    mask_low: u32,
}

impl ShardCoordinator {
    /// Create a coordinator for a node living in `self_id`.
    ///
    /// `self_id` may be `METACHAIN_SHARD_ID`.
    pub fn new(num_shards: u32, self_id: ShardId) -> Result<Self, ShardingError> {
        if num_shards == 0 {
            return Err(ShardingError::ZeroShards);
        }
        if self_id >= num_shards && self_id != METACHAIN_SHARD_ID {
            return Err(ShardingError::InvalidSelfId {
                self_id,
                num_shards,
            });
        }

        let bits = u32::BITS - (num_shards - 1).leading_zeros();
        let mask_high = if bits == 0 { 0 } else { (1u32 << bits) - 1 };
        let mask_low = if bits <= 1 { 0 } else { (1u32 << (bits - 1)) - 1 };

        Ok(Self {
            num_shards,
            self_id,
            mask_high,
            mask_low,
        })
    }

    pub fn number_of_shards(&self) -> u32 {
        self.num_shards
    }

    pub fn self_id(&self) -> ShardId {
        self.self_id
    }

    pub fn is_metachain(&self) -> bool {
        self.self_id == METACHAIN_SHARD_ID
    }

    /// True for every regular shard and for the metachain.
    pub fn is_valid_shard(&self, shard_id: ShardId) -> bool {
        shard_id < self.num_shards || shard_id == METACHAIN_SHARD_ID
    }

    /// Shard owning `address`, computed from its trailing bytes.
    pub fn compute_id(&self, address: &[u8]) -> ShardId {
        let start = address.len().saturating_sub(ADDRESS_SUFFIX_LEN);
        let tail = &address[start..];
        let mut buf = [0u8; ADDRESS_SUFFIX_LEN];
        buf[ADDRESS_SUFFIX_LEN - tail.len()..].copy_from_slice(tail);
        let value = u32::from_be_bytes(buf);

        let id = value & self.mask_high;
        if id >= self.num_shards {
            value & self.mask_low
        } else {
            id
        }
    }

    /// True if both addresses belong to the same shard.
    pub fn same_shard(&self, first: &[u8], second: &[u8]) -> bool {
        self.compute_id(first) == self.compute_id(second)
    }

    /// Topic suffix for traffic between this node's shard and `destination`.
    ///
    /// Same shard yields `_<id>`; otherwise `_<low>_<high>` where the
    /// metachain is written `META` and always comes last.
    pub fn communication_identifier(&self, destination: ShardId) -> String {
        communication_identifier(self.self_id, destination)
    }
}

/// Topic suffix between two arbitrary shards.
pub fn communication_identifier(first: ShardId, second: ShardId) -> String {
    if first == second {
        return format!("_{}", shard_label(first));
    }
    let (low, high) = if first < second {
        (first, second)
    } else {
        (second, first)
    };
    format!("_{}_{}", shard_label(low), shard_label(high))
}

fn shard_label(shard_id: ShardId) -> String {
    if shard_id == METACHAIN_SHARD_ID {
        "META".to_string()
    } else {
        shard_id.to_string()
    }
}
