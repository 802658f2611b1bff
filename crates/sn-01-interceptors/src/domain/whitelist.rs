//! Whitelist of wanted data hashes.
//!
//! Bounded by capacity (least recently added evicted first) and by TTL
//! (expired entries read as absent). Callers add hashes when they request data from
//! another shard so the reply passes the relevance filter.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::Hash;

use crate::domain::quota::duration_ms;
use crate::domain::InterceptedData;
use crate::events::InterceptorError;
use crate::ports::{TimeSource, WhiteListHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteListConfig {
    pub capacity: usize,
    #[serde(with = "duration_ms")]
    pub ttl: Duration,
}

impl Default for WhiteListConfig {
    fn default() -> Self {
        Self {
            capacity: 50_000,
            ttl: Duration::from_secs(5 * 60),
        }
    }
}

struct Inner {
    expiries: HashMap<Hash, u64>,
    insertion_order: VecDeque<Hash>,
}

pub struct WhiteListCache {
    config: WhiteListConfig,
    time: Arc<dyn TimeSource>,
    inner: Mutex<Inner>,
}

impl WhiteListCache {
    pub fn new(config: WhiteListConfig, time: Arc<dyn TimeSource>) -> Result<Self, InterceptorError> {
        if config.capacity == 0 {
            return Err(InterceptorError::InvalidConfig(
                "whitelist capacity must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            config,
            time,
            inner: Mutex::new(Inner {
                expiries: HashMap::with_capacity(config.capacity),
                insertion_order: VecDeque::with_capacity(config.capacity),
            }),
        })
    }

    /// Whitelist `hashes`. Re-adding a hash refreshes its TTL and moves it
    /// to the back of the eviction order.
    pub fn add(&self, hashes: &[Hash]) {
        let expiry = self
            .time
            .now_ms()
            .saturating_add(self.config.ttl.as_millis() as u64);
        let mut inner = self.inner.lock();

        for hash in hashes {
            if let Some(existing) = inner.expiries.get_mut(hash) {
                *existing = expiry;
                inner.insertion_order.retain(|h| h != hash);
                inner.insertion_order.push_back(*hash);
                continue;
            }
            // Evict oldest if at capacity
            if inner.expiries.len() >= self.config.capacity {
                if let Some(oldest) = inner.insertion_order.pop_front() {
                    inner.expiries.remove(&oldest);
                }
            }
            inner.expiries.insert(*hash, expiry);
            inner.insertion_order.push_back(*hash);
        }
    }

    pub fn remove(&self, hashes: &[Hash]) {
        let mut inner = self.inner.lock();
        for hash in hashes {
            if inner.expiries.remove(hash).is_some() {
                inner.insertion_order.retain(|h| h != hash);
            }
        }
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        let now = self.time.now_ms();
        let mut inner = self.inner.lock();
        match inner.expiries.get(hash) {
            Some(expiry) if now < *expiry => true,
            Some(_) => {
                inner.expiries.remove(hash);
                inner.insertion_order.retain(|h| h != hash);
                false
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WhiteListHandler for WhiteListCache {
    fn is_whitelisted(&self, data: &InterceptedData) -> bool {
        self.contains(data.hash())
    }
}
