//! # Shard Node
//!
//! Holds the admission and recovery components of one node and wires them
//! onto a `Messenger`.
//!
//! ## Initialization Order
//!
//! ```text
//! config ──→ ShardCoordinator
//!        ──→ DataPool, StorageService            (shared state)
//!        ──→ P2pAntiflood, WhiteListCache        (shared guards)
//!        ──→ InterceptorsContainer               (one per gossip topic)
//!        ──→ ResolversContainer + ResolverFinder (one per request topic)
//! start() registers both containers on the messenger and, inside a tokio
//!         runtime, spawns the antiflood sweeper.
//! ```
//!
//! Every outgoing request whitelists the requested hashes first, so the
//! answer passes the shard-relevance filter when it comes back.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::topics::{
    METACHAIN_BLOCKS_TOPIC, MINI_BLOCKS_TOPIC, SHARD_BLOCKS_TOPIC, TRANSACTION_TOPIC,
};
use shared_types::{Hash, Messenger, ShardCoordinator, ShardId};
use sn_01_interceptors::{
    InterceptedDebugger, InterceptorError, InterceptorsContainer, InterceptorsContainerFactory,
    P2pAntiflood, SystemTimeSource, TimeSource, WhiteListCache,
};
use sn_02_resolvers::{
    DataPool, Resolver, ResolverError, ResolverFinder, ResolversContainer,
    ResolversContainerFactory, StorageService,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::adapters::PoolProcessor;
use crate::container::config::{ConfigError, NodeConfig};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Interceptor(#[from] InterceptorError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

pub struct ShardNode {
    coordinator: ShardCoordinator,
    messenger: Arc<dyn Messenger>,
    pool: Arc<DataPool>,
    storage: Arc<StorageService>,
    antiflood: Arc<P2pAntiflood>,
    whitelist: Arc<WhiteListCache>,
    interceptors: InterceptorsContainer,
    finder: ResolverFinder,
    sweep_interval: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl ShardNode {
    pub fn new(config: &NodeConfig, messenger: Arc<dyn Messenger>) -> Result<Self, NodeError> {
        Self::with_time(config, messenger, Arc::new(SystemTimeSource))
    }

    /// Build with an explicit clock for quota windows, blacklist and whitelist expiry.
    pub fn with_time(
        config: &NodeConfig,
        messenger: Arc<dyn Messenger>,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let coordinator = config.coordinator()?;

        let pool = Arc::new(DataPool::new(config.resolvers.pool));
        let storage = Arc::new(StorageService::in_memory());
        let antiflood = Arc::new(P2pAntiflood::new(config.antiflood, Arc::clone(&time)));
        let whitelist = Arc::new(WhiteListCache::new(config.whitelist, time)?);

        let interceptors = InterceptorsContainerFactory::new(
            coordinator,
            config.node.chain_id.as_bytes().to_vec(),
            PoolProcessor::set(&pool),
            antiflood.clone(),
            whitelist.clone(),
            config.throttler.max_in_flight,
        )?
        .create()?;

        let resolvers = ResolversContainerFactory::new(
            coordinator,
            Arc::clone(&messenger),
            Arc::clone(&pool),
            Arc::clone(&storage),
            antiflood.clone(),
            config.throttler.max_in_flight,
            config.resolvers.num_peers_to_query,
        )?
        .create()?;

        Ok(Self {
            coordinator,
            messenger,
            pool,
            storage,
            antiflood,
            whitelist,
            interceptors,
            finder: ResolverFinder::new(coordinator, Arc::new(resolvers)),
            sweep_interval: config.antiflood.sweep_interval,
            sweeper: Mutex::new(None),
        })
    }

    /// Register every interceptor and resolver on the messenger.
    ///
    /// Called from within a tokio runtime, also spawns the periodic
    /// antiflood sweep; without one, `sweep` must be driven by the caller.
    pub fn start(&self) -> Result<(), NodeError> {
        self.interceptors.register_on(self.messenger.as_ref())?;
        self.finder.container().register_on(self.messenger.as_ref())?;
        let sweeping = self.spawn_sweeper();
        info!(
            shard_id = self.coordinator.self_id(),
            peer_id = %self.messenger.id().short(),
            interceptors = self.interceptors.len(),
            resolvers = self.finder.container().len(),
            sweeping,
            "node started"
        );
        Ok(())
    }

    fn spawn_sweeper(&self) -> bool {
        if self.sweep_interval.is_zero() {
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return false;
        };
        let mut sweeper = self.sweeper.lock();
        if sweeper.is_some() {
            return true;
        }
        let antiflood = Arc::clone(&self.antiflood);
        let period = self.sweep_interval;
        *sweeper = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let swept = antiflood.sweep();
                if swept > 0 {
                    debug!(swept, "antiflood state swept");
                }
            }
        }));
        true
    }

    pub fn coordinator(&self) -> ShardCoordinator {
        self.coordinator
    }

    pub fn pool(&self) -> &Arc<DataPool> {
        &self.pool
    }

    pub fn storage(&self) -> &Arc<StorageService> {
        &self.storage
    }

    pub fn antiflood(&self) -> &Arc<P2pAntiflood> {
        &self.antiflood
    }

    pub fn whitelist(&self) -> &Arc<WhiteListCache> {
        &self.whitelist
    }

    pub fn interceptors(&self) -> &InterceptorsContainer {
        &self.interceptors
    }

    pub fn finder(&self) -> &ResolverFinder {
        &self.finder
    }

    pub fn set_intercepted_debug_handler(&self, handler: Arc<dyn InterceptedDebugger>) {
        self.interceptors.set_intercepted_debug_handler(handler);
    }

    /// Drop elapsed quota windows and expired blacklist entries.
    pub fn sweep(&self) -> usize {
        self.antiflood.sweep()
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // =========================================================================
    // REQUESTS
    // =========================================================================

    pub fn request_transactions(&self, shard_id: ShardId, hashes: &[Hash]) -> Result<(), NodeError> {
        let resolver = self.finder.cross_shard_resolver(TRANSACTION_TOPIC, shard_id)?;
        self.request_hashes(resolver, hashes)
    }

    pub fn request_mini_blocks(&self, shard_id: ShardId, hashes: &[Hash]) -> Result<(), NodeError> {
        let resolver = self.finder.cross_shard_resolver(MINI_BLOCKS_TOPIC, shard_id)?;
        self.request_hashes(resolver, hashes)
    }

    pub fn request_meta_header(&self, hash: &Hash) -> Result<(), NodeError> {
        let resolver = self.finder.meta_chain_resolver(METACHAIN_BLOCKS_TOPIC)?;
        self.request_hashes(resolver, std::slice::from_ref(hash))
    }

    pub fn request_meta_header_by_nonce(&self, nonce: u64) -> Result<(), NodeError> {
        let resolver = self.finder.meta_chain_resolver(METACHAIN_BLOCKS_TOPIC)?;
        self.finder
            .with_header_requester(&resolver, |requester| requester.request_data_from_nonce(nonce))?;
        Ok(())
    }

    /// Shard header produced by `shard_id`. Shard nodes only reach their own
    /// shard's headers, through the metachain topic.
    pub fn request_shard_header(&self, shard_id: ShardId, hash: &Hash) -> Result<(), NodeError> {
        let resolver = self.shard_header_resolver(shard_id)?;
        self.request_hashes(resolver, std::slice::from_ref(hash))
    }

    pub fn request_shard_header_by_nonce(&self, shard_id: ShardId, nonce: u64) -> Result<(), NodeError> {
        let resolver = self.shard_header_resolver(shard_id)?;
        self.finder
            .with_header_requester(&resolver, |requester| requester.request_data_from_nonce(nonce))?;
        Ok(())
    }

    fn shard_header_resolver(&self, shard_id: ShardId) -> Result<Arc<dyn Resolver>, ResolverError> {
        if self.coordinator.is_metachain() {
            self.finder.cross_shard_resolver(SHARD_BLOCKS_TOPIC, shard_id)
        } else {
            self.finder.meta_chain_resolver(SHARD_BLOCKS_TOPIC)
        }
    }

    fn request_hashes(&self, resolver: Arc<dyn Resolver>, hashes: &[Hash]) -> Result<(), NodeError> {
        self.whitelist.add(hashes);
        match hashes {
            [hash] => resolver.request_data_from_hash(hash)?,
            _ => resolver.request_data_from_hash_array(hashes)?,
        }
        Ok(())
    }
}

impl Drop for ShardNode {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}
