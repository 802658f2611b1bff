//! Mock collaborators shared by the interceptor tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::{
    codec, Hash, MetaHeader, P2pMessage, PeerId, ShardCoordinator, ShardHeader, ShardId,
    Transaction,
};

use crate::domain::{CountingThrottler, DataKind, InterceptedData, TopicDataFactory};
use crate::events::{AntifloodError, ProcessorError};
use crate::interceptors::common::InterceptorBuilder;
use crate::ports::{AntifloodHandler, InterceptorProcessor, InterceptorThrottler, WhiteListHandler};

pub const CHAIN: &[u8] = b"shardnet-test";

pub fn originator() -> PeerId {
    PeerId::new([0xAA; 32])
}

pub fn connected() -> PeerId {
    PeerId::new([0xBB; 32])
}

// =============================================================================
// MOCKS
// =============================================================================

#[derive(Default)]
pub struct MockAntiflood {
    reject_ingress: AtomicBool,
    reject_topic: AtomicBool,
    blacklisted: Mutex<Vec<(PeerId, Duration)>>,
    topic_calls: Mutex<Vec<(String, u32, u64)>>,
}

impl MockAntiflood {
    pub fn reject_ingress(&self, reject: bool) {
        self.reject_ingress.store(reject, Ordering::SeqCst);
    }

    pub fn reject_topic(&self, reject: bool) {
        self.reject_topic.store(reject, Ordering::SeqCst);
    }

    pub fn blacklisted(&self) -> Vec<(PeerId, Duration)> {
        self.blacklisted.lock().clone()
    }

    /// (topic, num_messages, seq_no) per topic quota check.
    pub fn topic_calls(&self) -> Vec<(String, u32, u64)> {
        self.topic_calls.lock().clone()
    }
}

impl AntifloodHandler for MockAntiflood {
    fn can_process_message(
        &self,
        message: &P2pMessage,
        _from_connected_peer: &PeerId,
    ) -> Result<(), AntifloodError> {
        if self.reject_ingress.load(Ordering::SeqCst) {
            return Err(AntifloodError::Blacklisted(message.peer));
        }
        Ok(())
    }

    fn can_process_messages_on_topic(
        &self,
        peer: &PeerId,
        topic: &str,
        num_messages: u32,
        _total_size: u64,
        seq_no: u64,
    ) -> Result<(), AntifloodError> {
        self.topic_calls
            .lock()
            .push((topic.to_string(), num_messages, seq_no));
        if self.reject_topic.load(Ordering::SeqCst) {
            return Err(AntifloodError::TopicQuotaExceeded {
                peer: *peer,
                topic: topic.to_string(),
                messages: num_messages,
                bytes: 0,
            });
        }
        Ok(())
    }

    fn blacklist_peer(&self, peer: &PeerId, _reason: &str, duration: Duration) {
        self.blacklisted.lock().push((*peer, duration));
    }

    fn is_blacklisted(&self, peer: &PeerId) -> bool {
        self.blacklisted.lock().iter().any(|(p, _)| p == peer)
    }
}

#[derive(Default)]
pub struct MockProcessor {
    saved: Mutex<Vec<Hash>>,
    failing_nonces: Mutex<HashSet<u64>>,
}

impl MockProcessor {
    pub fn saved(&self) -> Vec<Hash> {
        self.saved.lock().clone()
    }

    pub fn fail_nonce(&self, nonce: u64) {
        self.failing_nonces.lock().insert(nonce);
    }
}

impl InterceptorProcessor for MockProcessor {
    fn validate(&self, data: &InterceptedData, _from: &PeerId) -> Result<(), ProcessorError> {
        let nonce = match data {
            InterceptedData::Transaction(d) => d.tx.nonce,
            InterceptedData::ShardHeader(d) => d.header.nonce,
            InterceptedData::MetaHeader(d) => d.header.nonce,
            InterceptedData::MiniBlock(_) => return Ok(()),
        };
        if self.failing_nonces.lock().contains(&nonce) {
            return Err(ProcessorError::Rejected(format!("nonce {nonce}")));
        }
        Ok(())
    }

    fn save(&self, data: &InterceptedData, _from: &PeerId, _topic: &str) -> Result<(), ProcessorError> {
        self.saved.lock().push(*data.hash());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockWhiteList {
    hashes: Mutex<HashSet<Hash>>,
}

impl MockWhiteList {
    pub fn add(&self, hash: Hash) {
        self.hashes.lock().insert(hash);
    }
}

impl WhiteListHandler for MockWhiteList {
    fn is_whitelisted(&self, data: &InterceptedData) -> bool {
        self.hashes.lock().contains(data.hash())
    }
}

// =============================================================================
// FIXTURE
// =============================================================================

pub struct Fixture {
    pub coordinator: ShardCoordinator,
    pub throttler: Arc<CountingThrottler>,
    pub antiflood: Arc<MockAntiflood>,
    pub processor: Arc<MockProcessor>,
    pub whitelist: Arc<MockWhiteList>,
}

impl Fixture {
    /// Single-shard node with a throttler bound of `max_in_flight`.
    pub fn new(max_in_flight: u32) -> Self {
        Self::with_shards(1, 0, max_in_flight)
    }

    pub fn with_shards(num_shards: u32, self_id: ShardId, max_in_flight: u32) -> Self {
        Self {
            coordinator: ShardCoordinator::new(num_shards, self_id).unwrap(),
            throttler: Arc::new(CountingThrottler::new(max_in_flight).unwrap()),
            antiflood: Arc::new(MockAntiflood::default()),
            processor: Arc::new(MockProcessor::default()),
            whitelist: Arc::new(MockWhiteList::default()),
        }
    }

    pub fn builder(&self, topic: &str, kind: DataKind) -> InterceptorBuilder {
        let factory = TopicDataFactory::new(kind, self.coordinator, CHAIN.to_vec()).unwrap();
        InterceptorBuilder::new(topic)
            .factory(Arc::new(factory))
            .processor(self.processor.clone())
            .throttler(self.throttler.clone())
            .antiflood(self.antiflood.clone())
            .whitelist(self.whitelist.clone())
    }

    /// Take one throttler slot and keep it.
    pub fn occupy_slot(&self) {
        self.throttler.start_processing();
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

fn address_in_shard(shard: u8) -> Vec<u8> {
    let mut address = vec![0u8; 32];
    address[31] = shard;
    address
}

fn tx(nonce: u64, shard: u8) -> Transaction {
    Transaction {
        nonce,
        sender: address_in_shard(shard),
        receiver: address_in_shard(shard),
        gas_price: 1,
        gas_limit: 50_000,
        chain_id: CHAIN.to_vec(),
        signature: vec![7; 64],
        ..Default::default()
    }
}

pub fn tx_bytes(nonce: u64) -> Vec<u8> {
    codec::encode(&tx(nonce, 0)).unwrap()
}

pub fn unsigned_tx_bytes(nonce: u64) -> Vec<u8> {
    let mut tx = tx(nonce, 0);
    tx.signature.clear();
    codec::encode(&tx).unwrap()
}

/// Transaction whose sender and receiver both live in shard 1.
pub fn foreign_tx_bytes(nonce: u64) -> Vec<u8> {
    codec::encode(&tx(nonce, 1)).unwrap()
}

pub fn hash_of_tx_bytes(bytes: &[u8]) -> Hash {
    let tx: Transaction = codec::decode(bytes).unwrap();
    codec::hash_of(&tx).unwrap()
}

pub fn shard_header(nonce: u64, shard_id: ShardId) -> ShardHeader {
    ShardHeader {
        nonce,
        round: nonce,
        shard_id,
        prev_hash: vec![1; 32],
        root_hash: vec![2; 32],
        chain_id: CHAIN.to_vec(),
        signature: vec![3; 48],
        ..Default::default()
    }
}

pub fn meta_header(nonce: u64) -> MetaHeader {
    MetaHeader {
        nonce,
        round: nonce,
        prev_hash: vec![1; 32],
        root_hash: vec![2; 32],
        chain_id: CHAIN.to_vec(),
        signature: vec![3; 48],
        ..Default::default()
    }
}
