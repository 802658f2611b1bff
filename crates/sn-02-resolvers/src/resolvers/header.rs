//! Header resolver: shard headers or meta headers, by hash or by nonce.
//!
//! The answer is a batch of one encoded header, consumed by the batch
//! interceptor on the base topic like every other response.

use std::sync::Arc;

use shared_types::{codec, Hash, MessageProcessor, P2pMessage, PeerId, ProcessError, ShardId, METACHAIN_SHARD_ID};
use tracing::trace;

use crate::adapters::{nonce_key, UnitType};
use crate::domain::{NonceHashIndex, RequestData, RequestDataKind};
use crate::events::ResolverError;
use crate::ports::{HeaderRequester, Resolver};
use crate::resolvers::builder::{ResolverBuilder, ResolverParts};
use crate::resolvers::common::unsupported;

/// Which headers a resolver serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    /// Shard headers produced by the given shard.
    Shard(ShardId),
    Meta,
}

impl HeaderSource {
    fn nonce_shard(&self) -> ShardId {
        match self {
            HeaderSource::Shard(shard_id) => *shard_id,
            HeaderSource::Meta => METACHAIN_SHARD_ID,
        }
    }

    fn header_unit(&self) -> UnitType {
        match self {
            HeaderSource::Shard(_) => UnitType::ShardHeaders,
            HeaderSource::Meta => UnitType::MetaHeaders,
        }
    }

    fn nonce_unit(&self) -> UnitType {
        match self {
            HeaderSource::Shard(_) => UnitType::ShardHeaderNonces,
            HeaderSource::Meta => UnitType::MetaHeaderNonces,
        }
    }
}

pub struct HeaderResolver {
    parts: ResolverParts,
    source: HeaderSource,
}

impl HeaderResolver {
    pub fn source(&self) -> HeaderSource {
        self.source
    }

    fn nonces(&self) -> &NonceHashIndex {
        match self.source {
            HeaderSource::Shard(_) => self.parts.pool.shard_header_nonces(),
            HeaderSource::Meta => self.parts.pool.meta_header_nonces(),
        }
    }

    /// Answer one incoming request.
    pub fn resolve(&self, message: &P2pMessage, from_connected_peer: &PeerId) -> Result<(), ResolverError> {
        let core = &self.parts.core;
        let _slot = core.pre_process(message, from_connected_peer)?;
        let request = core.parse_request(message, from_connected_peer)?;

        let hash = match request.kind {
            RequestDataKind::Hash => Some(request.hash()?),
            RequestDataKind::Nonce => self.hash_for_nonce(request.nonce()?)?,
            RequestDataKind::HashArray => return Err(unsupported(&request, core.topic())),
        };

        match hash.map(|hash| self.fetch(&hash)).transpose()?.flatten() {
            Some(buff) => core.respond_with_batch(vec![buff], from_connected_peer),
            None => {
                core.not_found(from_connected_peer);
                Ok(())
            }
        }
    }

    /// Encoded header for `hash`: pool first, then storage.
    fn fetch(&self, hash: &Hash) -> Result<Option<Vec<u8>>, ResolverError> {
        let pool = &self.parts.pool;
        let from_pool = match self.source {
            HeaderSource::Shard(_) => pool.shard_headers().get(hash).map(|h| codec::encode(&h)),
            HeaderSource::Meta => pool.meta_headers().get(hash).map(|h| codec::encode(&h)),
        };
        if let Some(buff) = from_pool.transpose()? {
            return Ok(Some(buff));
        }
        Ok(self.parts.storage.get(self.source.header_unit(), hash)?)
    }

    /// Hash at `nonce`: nonce index first, then the nonce storage unit.
    fn hash_for_nonce(&self, nonce: u64) -> Result<Option<Hash>, ResolverError> {
        let shard_id = self.source.nonce_shard();
        if let Some(hash) = self.nonces().get(nonce, shard_id) {
            return Ok(Some(hash));
        }
        let stored = self
            .parts
            .storage
            .get(self.source.nonce_unit(), &nonce_key(nonce, shard_id))?;
        Ok(stored.and_then(|bytes| Hash::try_from(bytes.as_slice()).ok()))
    }
}

impl ResolverBuilder {
    pub fn build_header(self, source: HeaderSource) -> Result<HeaderResolver, ResolverError> {
        Ok(HeaderResolver {
            parts: self.into_parts()?,
            source,
        })
    }
}

impl HeaderRequester for HeaderResolver {
    /// Known nonces are requested by hash; unknown ones by nonce.
    fn request_data_from_nonce(&self, nonce: u64) -> Result<(), ResolverError> {
        match self.nonces().get(nonce, self.source.nonce_shard()) {
            Some(hash) => {
                trace!(topic = %self.topic(), nonce, "nonce known locally, requesting by hash");
                self.request_data_from_hash(&hash)
            }
            None => self
                .parts
                .core
                .sender
                .send_on_request_topic(&RequestData::from_nonce(nonce)),
        }
    }
}

impl Resolver for HeaderResolver {
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
        for hash in hashes {
            self.request_data_from_hash(hash)?;
        }
        Ok(())
    }

    fn as_header_resolver(&self) -> Option<&dyn HeaderRequester> {
        Some(self)
    }

    fn into_message_processor(self: Arc<Self>) -> Arc<dyn MessageProcessor> {
        self
    }
}

impl MessageProcessor for HeaderResolver {
    fn process_received_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), ProcessError> {
        self.resolve(message, from_connected_peer).map_err(Into::into)
    }
}
