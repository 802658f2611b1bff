//! Shared fixture for the resolver tests.

use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::PeerId;
use sn_01_interceptors::{AntifloodConfig, CountingThrottler, ManualClock, P2pAntiflood};

use crate::adapters::StorageService;
use crate::domain::{DataPool, RequestData};
use crate::events::ResolverError;
use crate::ports::ResolverSender;
use crate::resolvers::builder::ResolverBuilder;

pub fn requester() -> PeerId {
    PeerId::new([0xCC; 32])
}

pub fn originator() -> PeerId {
    PeerId::new([0xAA; 32])
}

/// Records outgoing requests and responses instead of touching a network.
pub struct MockSender {
    topic: String,
    requests: Mutex<Vec<RequestData>>,
    responses: Mutex<Vec<(Vec<u8>, PeerId)>>,
}

impl MockSender {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RequestData> {
        self.requests.lock().clone()
    }

    pub fn responses(&self) -> Vec<(Vec<u8>, PeerId)> {
        self.responses.lock().clone()
    }
}

impl ResolverSender for MockSender {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn send_on_request_topic(&self, request: &RequestData) -> Result<(), ResolverError> {
        self.requests.lock().push(request.clone());
        Ok(())
    }

    fn send(&self, data: Vec<u8>, peer: &PeerId) -> Result<(), ResolverError> {
        self.responses.lock().push((data, *peer));
        Ok(())
    }
}

pub struct Fixture {
    pub sender: Arc<MockSender>,
    pub antiflood: Arc<P2pAntiflood>,
    pub throttler: Arc<CountingThrottler>,
    pub pool: Arc<DataPool>,
    pub storage: Arc<StorageService>,
}

impl Fixture {
    pub fn new(topic: &str) -> Self {
        Self {
            sender: Arc::new(MockSender::new(topic)),
            antiflood: Arc::new(P2pAntiflood::new(
                AntifloodConfig::default(),
                Arc::new(ManualClock::new(1_000)),
            )),
            throttler: Arc::new(CountingThrottler::new(4).unwrap()),
            pool: Arc::new(DataPool::default()),
            storage: Arc::new(StorageService::in_memory()),
        }
    }

    pub fn builder(&self) -> ResolverBuilder {
        ResolverBuilder::new()
            .sender(self.sender.clone())
            .antiflood(self.antiflood.clone())
            .throttler(self.throttler.clone())
            .pool(self.pool.clone())
            .storage(self.storage.clone())
    }
}
