//! Miniblock resolver.

use std::sync::Arc;

use shared_types::{codec, Hash, MessageProcessor, P2pMessage, PeerId, ProcessError};

use crate::adapters::UnitType;
use crate::domain::RequestData;
use crate::events::ResolverError;
use crate::ports::Resolver;
use crate::resolvers::builder::{ResolverBuilder, ResolverParts};
use crate::resolvers::common::requested_hashes;

pub struct MiniBlockResolver {
    parts: ResolverParts,
}

impl MiniBlockResolver {
    pub fn resolve(&self, message: &P2pMessage, from_connected_peer: &PeerId) -> Result<(), ResolverError> {
        let core = &self.parts.core;
        let _slot = core.pre_process(message, from_connected_peer)?;
        let request = core.parse_request(message, from_connected_peer)?;

        let payloads = requested_hashes(&request, core.topic())?
            .iter()
            .filter_map(|hash| self.fetch(hash).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        core.respond_with_batch(payloads, from_connected_peer)
    }

    fn fetch(&self, hash: &Hash) -> Result<Option<Vec<u8>>, ResolverError> {
        if let Some(mini_block) = self.parts.pool.mini_blocks().get(hash) {
            return Ok(Some(codec::encode(&mini_block)?));
        }
        Ok(self.parts.storage.get(UnitType::MiniBlocks, hash)?)
    }
}

impl ResolverBuilder {
    pub fn build_mini_block(self) -> Result<MiniBlockResolver, ResolverError> {
        Ok(MiniBlockResolver {
            parts: self.into_parts()?,
        })
    }
}

impl Resolver for MiniBlockResolver {
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

impl MessageProcessor for MiniBlockResolver {
    fn process_received_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), ProcessError> {
        self.resolve(message, from_connected_peer).map_err(Into::into)
    }
}
