//! Nonce to hash index, per shard.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{Hash, ShardId};

/// Maps a header nonce to the hash of the header at that nonce, for each
/// shard that produced one.
#[derive(Default)]
pub struct NonceHashIndex {
    entries: RwLock<HashMap<u64, HashMap<ShardId, Hash>>>,
}

impl NonceHashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `hashes` into the entry for `nonce`, overwriting per shard.
    pub fn merge(&self, nonce: u64, hashes: impl IntoIterator<Item = (ShardId, Hash)>) {
        self.entries
            .write()
            .entry(nonce)
            .or_default()
            .extend(hashes);
    }

    pub fn get(&self, nonce: u64, shard_id: ShardId) -> Option<Hash> {
        self.entries
            .read()
            .get(&nonce)
            .and_then(|by_shard| by_shard.get(&shard_id))
            .copied()
    }

    /// Remove the hash for one shard; drops the nonce when nothing is left.
    pub fn remove(&self, nonce: u64, shard_id: ShardId) -> Option<Hash> {
        let mut entries = self.entries.write();
        let by_shard = entries.get_mut(&nonce)?;
        let removed = by_shard.remove(&shard_id);
        if by_shard.is_empty() {
            entries.remove(&nonce);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
