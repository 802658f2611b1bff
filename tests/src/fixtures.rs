//! # Test Fixtures
//!
//! Chain data builders and small clusters of `ShardNode`s sharing one
//! `InMemoryNetwork` and one manual clock.
//!
//! Addresses carry their shard in the trailing four bytes, so with two
//! shards `address(1, _)` always lands in shard 1.

use std::sync::Arc;

use node_runtime::adapters::PoolProcessor;
use node_runtime::{NodeConfig, ShardNode};
use primitive_types::U256;
use shared_bus::{InMemoryMessenger, InMemoryNetwork};
use shared_types::{
    codec, Batch, Hash, MetaHeader, MiniBlock, MiniBlockKind, PeerId, ShardCoordinator,
    ShardHeader, ShardId, Transaction,
};
use sn_01_interceptors::{
    AntifloodConfig, CountingThrottler, DataKind, ManualClock, MultiDataInterceptor, P2pAntiflood,
    TopicDataFactory, WhiteListCache, WhiteListConfig,
};
use sn_02_resolvers::DataPool;

/// Chain id of `NodeConfig::default()`.
pub const CHAIN_ID: &[u8] = b"shardnet";

/// Clock start, far from zero so windows never underflow.
pub const START_MS: u64 = 1_000_000;

// =============================================================================
// CHAIN DATA
// =============================================================================

pub fn peer(byte: u8) -> PeerId {
    PeerId::new([byte; 32])
}

pub fn address(shard_id: ShardId, tag: u8) -> Vec<u8> {
    let mut address = vec![tag; 32];
    address[28..].copy_from_slice(&shard_id.to_be_bytes());
    address
}

pub fn transaction(nonce: u64, sender_shard: ShardId, receiver_shard: ShardId) -> Transaction {
    Transaction {
        nonce,
        value: U256::from(nonce + 1) * U256::exp10(18),
        receiver: address(receiver_shard, 0xBB),
        sender: address(sender_shard, 0xAA),
        gas_price: 1_000_000_000,
        gas_limit: 50_000,
        data: Vec::new(),
        chain_id: CHAIN_ID.to_vec(),
        signature: vec![0x5A; 64],
    }
}

pub fn unsigned_transaction(nonce: u64) -> Transaction {
    Transaction {
        signature: Vec::new(),
        ..transaction(nonce, 0, 0)
    }
}

pub fn meta_header(nonce: u64) -> MetaHeader {
    MetaHeader {
        nonce,
        round: nonce,
        timestamp: START_MS + nonce,
        prev_hash: vec![0x01; 32],
        root_hash: vec![0x02; 32],
        shard_info: Vec::new(),
        chain_id: CHAIN_ID.to_vec(),
        signature: vec![0x09; 64],
    }
}

pub fn shard_header(nonce: u64, shard_id: ShardId) -> ShardHeader {
    ShardHeader {
        nonce,
        round: nonce,
        shard_id,
        timestamp: START_MS + nonce,
        prev_hash: vec![0x03; 32],
        root_hash: vec![0x04; 32],
        mini_block_hashes: vec![vec![0x05; 32]],
        chain_id: CHAIN_ID.to_vec(),
        signature: vec![0x09; 64],
    }
}

pub fn mini_block(sender_shard: ShardId, receiver_shard: ShardId, tag: u8) -> MiniBlock {
    MiniBlock {
        sender_shard_id: sender_shard,
        receiver_shard_id: receiver_shard,
        kind: MiniBlockKind::TxBlock,
        tx_hashes: vec![vec![tag; 32], vec![tag.wrapping_add(1); 32]],
    }
}

pub fn hash<T: serde::Serialize>(value: &T) -> Hash {
    codec::hash_of(value).expect("hashable test data")
}

pub fn encoded<T: serde::Serialize>(value: &T) -> Vec<u8> {
    codec::encode(value).expect("encodable test data")
}

/// Multi-data payload carrying `elements`.
pub fn batch<T: serde::Serialize>(elements: &[T]) -> Vec<u8> {
    encoded(&Batch::new(elements.iter().map(encoded).collect()))
}

/// Valid encoding with the tail cut off.
pub fn truncated(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.truncate(bytes.len().saturating_sub(3));
    bytes
}

// =============================================================================
// CLUSTER
// =============================================================================

pub fn node_config(num_shards: u32, shard_id: ShardId) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.sharding.num_shards = num_shards;
    config.sharding.shard_id = shard_id;
    config
}

pub struct TestNode {
    pub messenger: Arc<InMemoryMessenger>,
    pub node: ShardNode,
}

impl TestNode {
    pub fn id(&self) -> PeerId {
        shared_types::Messenger::id(self.messenger.as_ref())
    }

    pub fn is_blacklisted(&self, peer: &PeerId) -> bool {
        self.node.antiflood().blacklist().contains(peer)
    }
}

/// Started nodes, fully connected, peer ids `[1; 32]`, `[2; 32]`, ...
pub struct Cluster {
    pub network: Arc<InMemoryNetwork>,
    pub clock: Arc<ManualClock>,
    nodes: Vec<TestNode>,
}

impl Cluster {
    pub fn new(num_shards: u32, shards: &[ShardId]) -> Self {
        Self::with_config(num_shards, shards, |_| {})
    }

    pub fn with_config<F>(num_shards: u32, shards: &[ShardId], tweak: F) -> Self
    where
        F: Fn(&mut NodeConfig),
    {
        let network = InMemoryNetwork::new();
        let clock = Arc::new(ManualClock::new(START_MS));
        let nodes = shards
            .iter()
            .enumerate()
            .map(|(index, shard_id)| {
                let mut config = node_config(num_shards, *shard_id);
                tweak(&mut config);
                let messenger = network
                    .join(peer(index as u8 + 1))
                    .expect("unique peer id");
                let node = ShardNode::with_time(&config, messenger.clone(), clock.clone())
                    .expect("valid node config");
                node.start().expect("node starts");
                TestNode { messenger, node }
            })
            .collect();
        network.connect_all();
        Self {
            network,
            clock,
            nodes,
        }
    }

    pub fn node(&self, index: usize) -> &TestNode {
        &self.nodes[index]
    }
}

// =============================================================================
// STANDALONE INTERCEPTOR
// =============================================================================

/// A transaction interceptor with every collaborator exposed.
pub struct InterceptorHarness {
    pub interceptor: Arc<MultiDataInterceptor>,
    pub throttler: Arc<CountingThrottler>,
    pub antiflood: Arc<P2pAntiflood>,
    pub pool: Arc<DataPool>,
    pub clock: Arc<ManualClock>,
}

impl InterceptorHarness {
    pub const TOPIC: &'static str = "transactions_0";

    pub fn new(max_in_flight: u32, antiflood: AntifloodConfig) -> Self {
        let coordinator = ShardCoordinator::new(1, 0).expect("one shard");
        let clock = Arc::new(ManualClock::new(START_MS));
        let throttler = Arc::new(CountingThrottler::new(max_in_flight).expect("non-zero bound"));
        let antiflood = Arc::new(P2pAntiflood::new(antiflood, clock.clone()));
        let whitelist = Arc::new(
            WhiteListCache::new(WhiteListConfig::default(), clock.clone()).expect("whitelist"),
        );
        let pool = Arc::new(DataPool::default());
        let factory = TopicDataFactory::new(DataKind::Transaction, coordinator, CHAIN_ID.to_vec())
            .expect("factory");

        let interceptor = MultiDataInterceptor::builder(Self::TOPIC)
            .factory(Arc::new(factory))
            .processor(Arc::new(PoolProcessor::new(DataKind::Transaction, Arc::clone(&pool))))
            .throttler(throttler.clone())
            .antiflood(antiflood.clone())
            .whitelist(whitelist)
            .build_multi_data()
            .expect("all collaborators set");

        Self {
            interceptor: Arc::new(interceptor),
            throttler,
            antiflood,
            pool,
            clock,
        }
    }
}
