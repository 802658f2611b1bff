//! Interceptor container and the factory wiring one interceptor per topic.
//!
//! Topic layout produced by [`InterceptorsContainerFactory`]:
//!
//! | Node      | Topic                                      | Payload     |
//! |-----------|--------------------------------------------|-------------|
//! | shard `s` | `transactions` + id(s, i), every shard i   | Transaction |
//! | shard `s` | `txBlockBodies` + id(s, i) and id(s, META) | MiniBlock   |
//! | shard `s` | `shardBlocks` + id(s, META)                | ShardHeader |
//! | any       | `metachainBlocks`                          | MetaHeader  |
//! | meta      | `txBlockBodies` + id(META, i)              | MiniBlock   |
//! | meta      | `shardBlocks` + id(META, i)                | ShardHeader |
//!
//! Every topic carries a `Batch`, so gossip and resolver answers share one
//! format; a single header travels as a batch of one.

use std::sync::Arc;

use shared_types::topics::{
    METACHAIN_BLOCKS_TOPIC, MINI_BLOCKS_TOPIC, SHARD_BLOCKS_TOPIC, TRANSACTION_TOPIC,
};
use shared_types::{Messenger, Registry, ShardCoordinator, METACHAIN_SHARD_ID};
use tracing::{debug, info};

use crate::domain::{CountingThrottler, DataKind, TopicDataFactory};
use crate::events::InterceptorError;
use crate::interceptors::common::InterceptorBuilder;
use crate::ports::{AntifloodHandler, InterceptedDebugger, Interceptor, InterceptorProcessor, WhiteListHandler};

// =============================================================================
// CONTAINER
// =============================================================================

/// Interceptors keyed by topic.
#[derive(Default)]
pub struct InterceptorsContainer {
    interceptors: Registry<String, Arc<dyn Interceptor>>,
}

impl InterceptorsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, interceptor: Arc<dyn Interceptor>) -> Result<(), InterceptorError> {
        self.interceptors
            .add(interceptor.topic().to_string(), interceptor)?;
        Ok(())
    }

    pub fn get(&self, topic: &str) -> Option<Arc<dyn Interceptor>> {
        self.interceptors.get(topic)
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics = self.interceptors.keys();
        topics.sort();
        topics
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Create every topic on `messenger` and register its interceptor.
    pub fn register_on(&self, messenger: &dyn Messenger) -> Result<(), InterceptorError> {
        for (topic, interceptor) in self.interceptors.entries() {
            if !messenger.has_topic(&topic) {
                messenger.create_topic(&topic)?;
            }
            messenger.register_message_processor(&topic, interceptor.into_message_processor())?;
            debug!(topic = %topic, "interceptor registered");
        }
        Ok(())
    }

    /// Install the same debug handler on every interceptor.
    pub fn set_intercepted_debug_handler(&self, handler: Arc<dyn InterceptedDebugger>) {
        for (_, interceptor) in self.interceptors.entries() {
            interceptor.set_intercepted_debug_handler(Arc::clone(&handler));
        }
    }
}

// =============================================================================
// FACTORY
// =============================================================================

/// One commit sink per payload kind.
#[derive(Clone)]
pub struct ProcessorSet {
    pub transaction: Arc<dyn InterceptorProcessor>,
    pub shard_header: Arc<dyn InterceptorProcessor>,
    pub meta_header: Arc<dyn InterceptorProcessor>,
    pub mini_block: Arc<dyn InterceptorProcessor>,
}

impl ProcessorSet {
    /// Same processor for every kind.
    pub fn uniform(processor: Arc<dyn InterceptorProcessor>) -> Self {
        Self {
            transaction: Arc::clone(&processor),
            shard_header: Arc::clone(&processor),
            meta_header: Arc::clone(&processor),
            mini_block: processor,
        }
    }

    fn for_kind(&self, kind: DataKind) -> Arc<dyn InterceptorProcessor> {
        match kind {
            DataKind::Transaction => Arc::clone(&self.transaction),
            DataKind::ShardHeader => Arc::clone(&self.shard_header),
            DataKind::MetaHeader => Arc::clone(&self.meta_header),
            DataKind::MiniBlock => Arc::clone(&self.mini_block),
        }
    }
}

pub struct InterceptorsContainerFactory {
    coordinator: ShardCoordinator,
    chain_id: Vec<u8>,
    processors: ProcessorSet,
    antiflood: Arc<dyn AntifloodHandler>,
    whitelist: Arc<dyn WhiteListHandler>,
    max_in_flight: u32,
}

impl InterceptorsContainerFactory {
    pub fn new(
        coordinator: ShardCoordinator,
        chain_id: Vec<u8>,
        processors: ProcessorSet,
        antiflood: Arc<dyn AntifloodHandler>,
        whitelist: Arc<dyn WhiteListHandler>,
        max_in_flight: u32,
    ) -> Result<Self, InterceptorError> {
        if chain_id.is_empty() {
            return Err(InterceptorError::InvalidConfig("empty chain id".to_string()));
        }
        if max_in_flight == 0 {
            return Err(InterceptorError::InvalidConfig(
                "throttler bound must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            coordinator,
            chain_id,
            processors,
            antiflood,
            whitelist,
            max_in_flight,
        })
    }

    pub fn create(&self) -> Result<InterceptorsContainer, InterceptorError> {
        let container = InterceptorsContainer::new();
        let self_id = self.coordinator.self_id();

        if self.coordinator.is_metachain() {
            for shard in 0..self.coordinator.number_of_shards() {
                let id = self.coordinator.communication_identifier(shard);
                self.add_multi(&container, format!("{MINI_BLOCKS_TOPIC}{id}"), DataKind::MiniBlock)?;
                self.add_multi(&container, format!("{SHARD_BLOCKS_TOPIC}{id}"), DataKind::ShardHeader)?;
            }
        } else {
            for shard in 0..self.coordinator.number_of_shards() {
                let id = self.coordinator.communication_identifier(shard);
                self.add_multi(&container, format!("{TRANSACTION_TOPIC}{id}"), DataKind::Transaction)?;
                self.add_multi(&container, format!("{MINI_BLOCKS_TOPIC}{id}"), DataKind::MiniBlock)?;
            }
            let meta_id = self.coordinator.communication_identifier(METACHAIN_SHARD_ID);
            self.add_multi(&container, format!("{MINI_BLOCKS_TOPIC}{meta_id}"), DataKind::MiniBlock)?;
            self.add_multi(&container, format!("{SHARD_BLOCKS_TOPIC}{meta_id}"), DataKind::ShardHeader)?;
        }
        self.add_multi(&container, METACHAIN_BLOCKS_TOPIC.to_string(), DataKind::MetaHeader)?;

        info!(
            shard_id = self_id,
            interceptors = container.len(),
            "interceptors container created"
        );
        Ok(container)
    }

    fn builder(&self, topic: String, kind: DataKind) -> Result<InterceptorBuilder, InterceptorError> {
        let factory = TopicDataFactory::new(kind, self.coordinator, self.chain_id.clone())?;
        Ok(InterceptorBuilder::new(topic)
            .factory(Arc::new(factory))
            .processor(self.processors.for_kind(kind))
            .throttler(Arc::new(CountingThrottler::new(self.max_in_flight)?))
            .antiflood(Arc::clone(&self.antiflood))
            .whitelist(Arc::clone(&self.whitelist)))
    }

    fn add_multi(
        &self,
        container: &InterceptorsContainer,
        topic: String,
        kind: DataKind,
    ) -> Result<(), InterceptorError> {
        let interceptor = self.builder(topic, kind)?.build_multi_data()?;
        container.add(Arc::new(interceptor))
    }
}
