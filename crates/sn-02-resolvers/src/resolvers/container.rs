//! Resolver container and the factory wiring one resolver per base topic.
//!
//! Resolvers are keyed by their base topic and listen on
//! `<base>_REQUEST`; responses leave on `<base>`, where the matching
//! interceptor picks them up.

use std::sync::Arc;

use shared_types::topics::{
    request_topic, METACHAIN_BLOCKS_TOPIC, MINI_BLOCKS_TOPIC, SHARD_BLOCKS_TOPIC, TRANSACTION_TOPIC,
};
use shared_types::{Messenger, Registry, ShardCoordinator, METACHAIN_SHARD_ID};
use sn_01_interceptors::{AntifloodHandler, CountingThrottler};
use tracing::{debug, info};

use crate::adapters::{StorageService, TopicResolverSender};
use crate::domain::DataPool;
use crate::events::ResolverError;
use crate::ports::Resolver;
use crate::resolvers::builder::ResolverBuilder;
use crate::resolvers::header::HeaderSource;

#[derive(Default)]
pub struct ResolversContainer {
    resolvers: Registry<String, Arc<dyn Resolver>>,
}

impl ResolversContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, resolver: Arc<dyn Resolver>) -> Result<(), ResolverError> {
        self.resolvers.add(resolver.topic().to_string(), resolver)?;
        Ok(())
    }

    pub fn get(&self, topic: &str) -> Result<Arc<dyn Resolver>, ResolverError> {
        self.resolvers
            .get(topic)
            .ok_or_else(|| ResolverError::ResolverNotFound(topic.to_string()))
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics = self.resolvers.keys();
        topics.sort();
        topics
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Create every request topic on `messenger` and register its resolver.
    pub fn register_on(&self, messenger: &dyn Messenger) -> Result<(), ResolverError> {
        for (topic, resolver) in self.resolvers.entries() {
            let request_topic = request_topic(&topic);
            if !messenger.has_topic(&request_topic) {
                messenger.create_topic(&request_topic)?;
            }
            messenger.register_message_processor(&request_topic, resolver.into_message_processor())?;
            debug!(topic = %request_topic, "resolver registered");
        }
        Ok(())
    }
}

pub struct ResolversContainerFactory {
    coordinator: ShardCoordinator,
    messenger: Arc<dyn Messenger>,
    pool: Arc<DataPool>,
    storage: Arc<StorageService>,
    antiflood: Arc<dyn AntifloodHandler>,
    max_in_flight: u32,
    num_peers_to_query: usize,
}

impl ResolversContainerFactory {
    pub fn new(
        coordinator: ShardCoordinator,
        messenger: Arc<dyn Messenger>,
        pool: Arc<DataPool>,
        storage: Arc<StorageService>,
        antiflood: Arc<dyn AntifloodHandler>,
        max_in_flight: u32,
        num_peers_to_query: usize,
    ) -> Result<Self, ResolverError> {
        if max_in_flight == 0 {
            return Err(ResolverError::InvalidConfig(
                "throttler bound must be greater than zero".to_string(),
            ));
        }
        if num_peers_to_query == 0 {
            return Err(ResolverError::InvalidConfig(
                "num_peers_to_query must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            coordinator,
            messenger,
            pool,
            storage,
            antiflood,
            max_in_flight,
            num_peers_to_query,
        })
    }

    pub fn create(&self) -> Result<ResolversContainer, ResolverError> {
        let container = ResolversContainer::new();

        if self.coordinator.is_metachain() {
            for shard in 0..self.coordinator.number_of_shards() {
                let id = self.coordinator.communication_identifier(shard);
                let mini_blocks = self.builder(format!("{MINI_BLOCKS_TOPIC}{id}"))?.build_mini_block()?;
                container.add(Arc::new(mini_blocks))?;
                let headers = self
                    .builder(format!("{SHARD_BLOCKS_TOPIC}{id}"))?
                    .build_header(HeaderSource::Shard(shard))?;
                container.add(Arc::new(headers))?;
            }
        } else {
            for shard in 0..self.coordinator.number_of_shards() {
                let id = self.coordinator.communication_identifier(shard);
                let txs = self.builder(format!("{TRANSACTION_TOPIC}{id}"))?.build_transaction()?;
                container.add(Arc::new(txs))?;
                let mini_blocks = self.builder(format!("{MINI_BLOCKS_TOPIC}{id}"))?.build_mini_block()?;
                container.add(Arc::new(mini_blocks))?;
            }
            let meta_id = self.coordinator.communication_identifier(METACHAIN_SHARD_ID);
            let mini_blocks = self
                .builder(format!("{MINI_BLOCKS_TOPIC}{meta_id}"))?
                .build_mini_block()?;
            container.add(Arc::new(mini_blocks))?;
            let headers = self
                .builder(format!("{SHARD_BLOCKS_TOPIC}{meta_id}"))?
                .build_header(HeaderSource::Shard(self.coordinator.self_id()))?;
            container.add(Arc::new(headers))?;
        }
        let meta_headers = self
            .builder(METACHAIN_BLOCKS_TOPIC.to_string())?
            .build_header(HeaderSource::Meta)?;
        container.add(Arc::new(meta_headers))?;

        info!(
            shard_id = self.coordinator.self_id(),
            resolvers = container.len(),
            "resolvers container created"
        );
        Ok(container)
    }

    fn builder(&self, topic: String) -> Result<ResolverBuilder, ResolverError> {
        let sender = TopicResolverSender::new(topic, Arc::clone(&self.messenger), self.num_peers_to_query)?;
        let throttler = CountingThrottler::new(self.max_in_flight)
            .map_err(|err| ResolverError::InvalidConfig(err.to_string()))?;
        Ok(ResolverBuilder::new()
            .sender(Arc::new(sender))
            .antiflood(Arc::clone(&self.antiflood))
            .throttler(Arc::new(throttler))
            .pool(Arc::clone(&self.pool))
            .storage(Arc::clone(&self.storage)))
    }
}
