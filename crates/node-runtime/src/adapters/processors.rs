//! Interceptor processors committing accepted data into the data pool.

use std::sync::Arc;

use shared_types::{PeerId, METACHAIN_SHARD_ID};
use sn_01_interceptors::{DataKind, InterceptedData, InterceptorProcessor, ProcessorError, ProcessorSet};
use sn_02_resolvers::DataPool;
use sn_telemetry::log_event;

/// Commits one kind of data into the pool.
///
/// Headers also land in the nonce index so that nonce requests can be
/// served without a storage round-trip.
pub struct PoolProcessor {
    kind: DataKind,
    pool: Arc<DataPool>,
}

impl PoolProcessor {
    pub fn new(kind: DataKind, pool: Arc<DataPool>) -> Self {
        Self { kind, pool }
    }

    /// One processor per kind, all backed by `pool`.
    pub fn set(pool: &Arc<DataPool>) -> ProcessorSet {
        ProcessorSet {
            transaction: Arc::new(Self::new(DataKind::Transaction, Arc::clone(pool))),
            shard_header: Arc::new(Self::new(DataKind::ShardHeader, Arc::clone(pool))),
            meta_header: Arc::new(Self::new(DataKind::MetaHeader, Arc::clone(pool))),
            mini_block: Arc::new(Self::new(DataKind::MiniBlock, Arc::clone(pool))),
        }
    }
}

impl InterceptorProcessor for PoolProcessor {
    fn validate(&self, data: &InterceptedData, _from: &PeerId) -> Result<(), ProcessorError> {
        if data.kind() != self.kind {
            return Err(ProcessorError::WrongKind(data.kind().as_str()));
        }
        Ok(())
    }

    fn save(&self, data: &InterceptedData, from: &PeerId, topic: &str) -> Result<(), ProcessorError> {
        let added = match data {
            InterceptedData::Transaction(tx) => {
                !self.pool.transactions().has_or_add(tx.hash, tx.tx.clone())
            }
            InterceptedData::MiniBlock(mini_block) => !self
                .pool
                .mini_blocks()
                .has_or_add(mini_block.hash, mini_block.mini_block.clone()),
            InterceptedData::ShardHeader(header) => {
                self.pool
                    .shard_header_nonces()
                    .merge(header.header.nonce, [(header.header.shard_id, header.hash)]);
                !self
                    .pool
                    .shard_headers()
                    .has_or_add(header.hash, header.header.clone())
            }
            InterceptedData::MetaHeader(header) => {
                self.pool
                    .meta_header_nonces()
                    .merge(header.header.nonce, [(METACHAIN_SHARD_ID, header.hash)]);
                !self
                    .pool
                    .meta_headers()
                    .has_or_add(header.hash, header.header.clone())
            }
        };
        log_event!(
            debug,
            "pool",
            "intercepted data saved",
            topic = %topic,
            peer_id = %from.short(),
            kind = data.kind().as_str(),
            hash = %data.hash_hex(),
            added
        );
        Ok(())
    }
}
