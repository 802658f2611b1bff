//! Transaction resolver.

use std::sync::Arc;

use shared_types::{codec, Hash, MessageProcessor, P2pMessage, PeerId, ProcessError};

use crate::adapters::UnitType;
use crate::domain::RequestData;
use crate::events::ResolverError;
use crate::ports::Resolver;
use crate::resolvers::builder::{ResolverBuilder, ResolverParts};
use crate::resolvers::common::requested_hashes;

/// Serves transactions by hash or hash array, pool first then storage.
/// Found transactions go back as one batch; missing hashes are skipped.
pub struct TxResolver {
    parts: ResolverParts,
}

impl TxResolver {
    pub fn resolve(&self, message: &P2pMessage, from_connected_peer: &PeerId) -> Result<(), ResolverError> {
        let core = &self.parts.core;
        let _slot = core.pre_process(message, from_connected_peer)?;
        let request = core.parse_request(message, from_connected_peer)?;
        let hashes = requested_hashes(&request, core.topic())?;

        let mut payloads = Vec::with_capacity(hashes.len());
        for hash in &hashes {
            if let Some(buff) = self.fetch(hash)? {
                payloads.push(buff);
            }
        }
        core.respond_with_batch(payloads, from_connected_peer)
    }

    fn fetch(&self, hash: &Hash) -> Result<Option<Vec<u8>>, ResolverError> {
        if let Some(tx) = self.parts.pool.transactions().get(hash) {
            return Ok(Some(codec::encode(&tx)?));
        }
        Ok(self.parts.storage.get(UnitType::Transactions, hash)?)
    }
}

impl ResolverBuilder {
    pub fn build_transaction(self) -> Result<TxResolver, ResolverError> {
        Ok(TxResolver {
            parts: self.into_parts()?,
        })
    }
}

impl Resolver for TxResolver {
    fn topic(&self) -> &str {
        self.parts.core.topic()
    }

    fn request_data_from_hash(&self, hash: &Hash) -> Result<(), ResolverError> {
        self.parts
            .core
            .sender
            .send_on_request_topic(&RequestData::from_hash(hash))
    }

    fn request_data_from_hash_array(&self, hashes: &[Hash]) -> Result<(), ResolverError> {
        self.parts
            .core
            .sender
            .send_on_request_topic(&RequestData::from_hashes(hashes)?)
    }

    fn into_message_processor(self: Arc<Self>) -> Arc<dyn MessageProcessor> {
        self
    }
}

impl MessageProcessor for TxResolver {
    fn process_received_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), ProcessError> {
        self.resolve(message, from_connected_peer).map_err(Into::into)
    }
}
