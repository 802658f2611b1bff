//! Resolver lookup by shard and base topic.

use std::sync::Arc;

use shared_types::{ShardCoordinator, ShardId, METACHAIN_SHARD_ID};

use crate::events::ResolverError;
use crate::ports::{HeaderRequester, Resolver};
use crate::resolvers::container::ResolversContainer;

/// Maps a base topic plus a destination shard onto the registered resolver.
///
/// | Lookup                 | Key tried                                |
/// |------------------------|------------------------------------------|
/// | `intra_shard_resolver` | `base` + id(self, self)                  |
/// | `cross_shard_resolver` | `base` + id(self, shard)                 |
/// | `meta_chain_resolver`  | `base` + id(self, META), then bare `base` |
pub struct ResolverFinder {
    coordinator: ShardCoordinator,
    container: Arc<ResolversContainer>,
}

impl ResolverFinder {
    pub fn new(coordinator: ShardCoordinator, container: Arc<ResolversContainer>) -> Self {
        Self {
            coordinator,
            container,
        }
    }

    pub fn intra_shard_resolver(&self, base_topic: &str) -> Result<Arc<dyn Resolver>, ResolverError> {
        self.cross_shard_resolver(base_topic, self.coordinator.self_id())
    }

    pub fn cross_shard_resolver(
        &self,
        base_topic: &str,
        shard_id: ShardId,
    ) -> Result<Arc<dyn Resolver>, ResolverError> {
        let topic = format!("{base_topic}{}", self.coordinator.communication_identifier(shard_id));
        self.container.get(&topic)
    }

    pub fn meta_chain_resolver(&self, base_topic: &str) -> Result<Arc<dyn Resolver>, ResolverError> {
        self.cross_shard_resolver(base_topic, METACHAIN_SHARD_ID)
            .or_else(|_| self.container.get(base_topic))
            .map_err(|_| ResolverError::ResolverNotFound(base_topic.to_string()))
    }

    /// Run `request` against `resolver` when it serves headers.
    pub fn with_header_requester<F>(
        &self,
        resolver: &Arc<dyn Resolver>,
        request: F,
    ) -> Result<(), ResolverError>
    where
        F: FnOnce(&dyn HeaderRequester) -> Result<(), ResolverError>,
    {
        let requester = resolver.as_header_resolver().ok_or_else(|| {
            ResolverError::UnsupportedRequest {
                kind: "nonce",
                topic: resolver.topic().to_string(),
            }
        })?;
        request(requester)
    }

    pub fn container(&self) -> &ResolversContainer {
        &self.container
    }
}
