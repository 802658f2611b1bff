//! # Core Wire Entities
//!
//! Defines the payloads that travel across gossip topics and the peer
//! identity used by the transport.
//!
//! ## Clusters
//!
//! - **Identity**: `PeerId`, `ShardId`
//! - **Chain data**: `Transaction`, `ShardHeader`, `MetaHeader`, `MiniBlock`
//!
//! Fields that reference other data (addresses, hashes, signatures) are kept
//! as variable-length byte vectors on purpose: they arrive from untrusted
//! peers and their lengths are checked by the interceptors, not by the codec.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte content hash (SHA-256).
pub type Hash = [u8; 32];

/// Length in bytes of hashes, addresses and public keys on the wire.
pub const HASH_LEN: usize = 32;

/// Shard identifier.
pub type ShardId = u32;

/// Shard id reserved for the metachain.
pub const METACHAIN_SHARD_ID: ShardId = u32::MAX;

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Identifier of a peer on the gossip network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct PeerId(pub [u8; 32]);

impl PeerId {
    /// Create a peer id from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the peer id from a (compressed) public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Self(sha256(public_key))
    }

    /// Raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short printable prefix used in log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.short())
    }
}

// =============================================================================
// CLUSTER B: CHAIN DATA
// =============================================================================

/// A user transaction as gossiped on the `transactions` topic.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Transaction {
    /// Sender's account nonce.
    pub nonce: u64,
    /// Transferred value in base units.
    pub value: U256,
    /// Receiver address.
    #[serde_as(as = "Bytes")]
    pub receiver: Vec<u8>,
    /// Sender address.
    #[serde_as(as = "Bytes")]
    pub sender: Vec<u8>,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// Call data.
    #[serde_as(as = "Bytes")]
    pub data: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub chain_id: Vec<u8>,
    /// Sender's signature over the other fields.
    #[serde_as(as = "Bytes")]
    pub signature: Vec<u8>,
}

/// A block header produced by a shard chain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShardHeader {
    pub nonce: u64,
    pub round: u64,
    pub shard_id: ShardId,
    pub timestamp: u64,
    #[serde_as(as = "Bytes")]
    pub prev_hash: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub root_hash: Vec<u8>,
    /// Hashes of the miniblocks included in the block body.
    pub mini_block_hashes: Vec<Vec<u8>>,
    #[serde_as(as = "Bytes")]
    pub chain_id: Vec<u8>,
    /// Leader signature.
    #[serde_as(as = "Bytes")]
    pub signature: Vec<u8>,
}

/// Notarisation record of a shard header inside a metachain header.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShardInfo {
    pub shard_id: ShardId,
    pub nonce: u64,
    #[serde_as(as = "Bytes")]
    pub header_hash: Vec<u8>,
}

/// A block header produced by the metachain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MetaHeader {
    pub nonce: u64,
    pub round: u64,
    pub timestamp: u64,
    #[serde_as(as = "Bytes")]
    pub prev_hash: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub root_hash: Vec<u8>,
    pub shard_info: Vec<ShardInfo>,
    #[serde_as(as = "Bytes")]
    pub chain_id: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub signature: Vec<u8>,
}

/// Category of the transactions bundled in a miniblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MiniBlockKind {
    #[default]
    TxBlock,
    SmartContractResult,
    Reward,
    Peer,
}

/// Group of transaction hashes moving from one shard to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MiniBlock {
    pub sender_shard_id: ShardId,
    pub receiver_shard_id: ShardId,
    pub kind: MiniBlockKind,
    pub tx_hashes: Vec<Vec<u8>>,
}
