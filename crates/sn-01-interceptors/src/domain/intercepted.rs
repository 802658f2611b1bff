//! Intercepted data variants.
//!
//! `InterceptedData` is a closed enum over the payload kinds carried on
//! gossip topics. Every variant answers three questions: its identity
//! (`hash`), whether this node should keep it (`is_for_current_shard`) and
//! whether it is structurally sound (`check_validity`). Values are only
//! built by a topic-bound factory, which computes the hash once.

use shared_types::{
    Hash, MetaHeader, MiniBlock, ShardCoordinator, ShardHeader, ShardId, Transaction, HASH_LEN,
    METACHAIN_SHARD_ID,
};

use crate::events::ValidationError;

/// Payload kind bound to a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Transaction,
    ShardHeader,
    MetaHeader,
    MiniBlock,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Transaction => "transaction",
            DataKind::ShardHeader => "shard_header",
            DataKind::MetaHeader => "meta_header",
            DataKind::MiniBlock => "mini_block",
        }
    }
}

/// Node-local facts needed to judge relevance and validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptContext {
    pub coordinator: ShardCoordinator,
    pub chain_id: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterceptedData {
    Transaction(InterceptedTransaction),
    ShardHeader(InterceptedShardHeader),
    MetaHeader(InterceptedMetaHeader),
    MiniBlock(InterceptedMiniBlock),
}

impl InterceptedData {
    pub fn kind(&self) -> DataKind {
        match self {
            InterceptedData::Transaction(_) => DataKind::Transaction,
            InterceptedData::ShardHeader(_) => DataKind::ShardHeader,
            InterceptedData::MetaHeader(_) => DataKind::MetaHeader,
            InterceptedData::MiniBlock(_) => DataKind::MiniBlock,
        }
    }

    pub fn hash(&self) -> &Hash {
        match self {
            InterceptedData::Transaction(d) => &d.hash,
            InterceptedData::ShardHeader(d) => &d.hash,
            InterceptedData::MetaHeader(d) => &d.hash,
            InterceptedData::MiniBlock(d) => &d.hash,
        }
    }

    /// Hex form of the hash, for log lines.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    pub fn is_for_current_shard(&self) -> bool {
        match self {
            InterceptedData::Transaction(d) => d.is_for_current_shard(),
            InterceptedData::ShardHeader(d) => d.is_for_current_shard(),
            InterceptedData::MetaHeader(_) => true,
            InterceptedData::MiniBlock(d) => d.is_for_current_shard(),
        }
    }

    pub fn check_validity(&self) -> Result<(), ValidationError> {
        match self {
            InterceptedData::Transaction(d) => d.check_validity(),
            InterceptedData::ShardHeader(d) => d.check_validity(),
            InterceptedData::MetaHeader(d) => d.check_validity(),
            InterceptedData::MiniBlock(d) => d.check_validity(),
        }
    }
}

// =============================================================================
// VARIANTS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct InterceptedTransaction {
    pub tx: Transaction,
    pub hash: Hash,
    pub sender_shard: ShardId,
    pub receiver_shard: ShardId,
    ctx: InterceptContext,
}

impl InterceptedTransaction {
    pub fn new(tx: Transaction, hash: Hash, ctx: InterceptContext) -> Self {
        let sender_shard = ctx.coordinator.compute_id(&tx.sender);
        let receiver_shard = ctx.coordinator.compute_id(&tx.receiver);
        Self {
            tx,
            hash,
            sender_shard,
            receiver_shard,
            ctx,
        }
    }

    fn is_for_current_shard(&self) -> bool {
        let self_id = self.ctx.coordinator.self_id();
        self.sender_shard == self_id || self.receiver_shard == self_id
    }

    fn check_validity(&self) -> Result<(), ValidationError> {
        check_len("sender", &self.tx.sender)?;
        check_len("receiver", &self.tx.receiver)?;
        check_signature(&self.tx.signature)?;
        if self.tx.gas_limit == 0 {
            return Err(ValidationError::ZeroGasLimit);
        }
        check_chain_id(&self.tx.chain_id, &self.ctx.chain_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterceptedShardHeader {
    pub header: ShardHeader,
    pub hash: Hash,
    ctx: InterceptContext,
}

impl InterceptedShardHeader {
    pub fn new(header: ShardHeader, hash: Hash, ctx: InterceptContext) -> Self {
        Self { header, hash, ctx }
    }

    // The metachain notarises every shard, so it keeps all shard headers.
    fn is_for_current_shard(&self) -> bool {
        self.ctx.coordinator.is_metachain() || self.header.shard_id == self.ctx.coordinator.self_id()
    }

    fn check_validity(&self) -> Result<(), ValidationError> {
        let shard_id = self.header.shard_id;
        if shard_id == METACHAIN_SHARD_ID || !self.ctx.coordinator.is_valid_shard(shard_id) {
            return Err(ValidationError::InvalidShardId(shard_id));
        }
        check_len("prev_hash", &self.header.prev_hash)?;
        check_len("root_hash", &self.header.root_hash)?;
        for hash in &self.header.mini_block_hashes {
            check_len("mini_block_hash", hash)?;
        }
        check_signature(&self.header.signature)?;
        check_chain_id(&self.header.chain_id, &self.ctx.chain_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterceptedMetaHeader {
    pub header: MetaHeader,
    pub hash: Hash,
    ctx: InterceptContext,
}

impl InterceptedMetaHeader {
    pub fn new(header: MetaHeader, hash: Hash, ctx: InterceptContext) -> Self {
        Self { header, hash, ctx }
    }

    fn check_validity(&self) -> Result<(), ValidationError> {
        check_len("prev_hash", &self.header.prev_hash)?;
        check_len("root_hash", &self.header.root_hash)?;
        for info in &self.header.shard_info {
            if info.shard_id == METACHAIN_SHARD_ID
                || !self.ctx.coordinator.is_valid_shard(info.shard_id)
            {
                return Err(ValidationError::InvalidShardId(info.shard_id));
            }
            check_len("shard_header_hash", &info.header_hash)?;
        }
        check_signature(&self.header.signature)?;
        check_chain_id(&self.header.chain_id, &self.ctx.chain_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterceptedMiniBlock {
    pub mini_block: MiniBlock,
    pub hash: Hash,
    ctx: InterceptContext,
}

impl InterceptedMiniBlock {
    pub fn new(mini_block: MiniBlock, hash: Hash, ctx: InterceptContext) -> Self {
        Self {
            mini_block,
            hash,
            ctx,
        }
    }

    fn is_for_current_shard(&self) -> bool {
        let self_id = self.ctx.coordinator.self_id();
        self.mini_block.sender_shard_id == self_id || self.mini_block.receiver_shard_id == self_id
    }

    fn check_validity(&self) -> Result<(), ValidationError> {
        for shard_id in [
            self.mini_block.sender_shard_id,
            self.mini_block.receiver_shard_id,
        ] {
            if !self.ctx.coordinator.is_valid_shard(shard_id) {
                return Err(ValidationError::InvalidShardId(shard_id));
            }
        }
        if self.mini_block.tx_hashes.is_empty() {
            return Err(ValidationError::Empty("tx_hashes"));
        }
        for hash in &self.mini_block.tx_hashes {
            check_len("tx_hash", hash)?;
        }
        Ok(())
    }
}

// =============================================================================
// STRUCTURAL CHECKS
// =============================================================================

fn check_len(field: &'static str, value: &[u8]) -> Result<(), ValidationError> {
    if value.len() != HASH_LEN {
        return Err(ValidationError::InvalidLength {
            field,
            expected: HASH_LEN,
            actual: value.len(),
        });
    }
    Ok(())
}

fn check_signature(signature: &[u8]) -> Result<(), ValidationError> {
    if signature.is_empty() {
        return Err(ValidationError::MissingSignature);
    }
    Ok(())
}

fn check_chain_id(received: &[u8], expected: &[u8]) -> Result<(), ValidationError> {
    if received != expected {
        return Err(ValidationError::ChainIdMismatch);
    }
    Ok(())
}
