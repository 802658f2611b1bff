//! Windowed message and byte quotas.
//!
//! Each key owns a window that starts on its first load. The load is added
//! before the limits are compared, so once a key goes over it stays over
//! until its window elapses; the next lookup after that starts a fresh
//! window.
//!
//! Keys come off the wire (originator ids are not authenticated), so the
//! map is pruned: inserting a new key drops every elapsed window, at most
//! once per window length. Only keys seen in the last two windows stay
//! tracked while traffic flows; `sweep` clears the rest when idle.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::ports::TimeSource;

/// Limits for one quota family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    pub max_messages: u32,
    pub max_bytes: u64,
    #[serde(with = "duration_ms")]
    pub window: Duration,
}

impl QuotaConfig {
    pub fn new(max_messages: u32, max_bytes: u64, window: Duration) -> Self {
        Self {
            max_messages,
            max_bytes,
            window,
        }
    }
}

/// Load accumulated by a key in its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaUsage {
    pub messages: u32,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy)]
struct Quota {
    window_start_ms: u64,
    usage: QuotaUsage,
}

struct Windows<K> {
    quotas: HashMap<K, Quota>,
    last_prune_ms: u64,
}

impl<K: Eq + Hash> Windows<K> {
    fn prune(&mut self, now: u64, window_ms: u64) -> usize {
        let before = self.quotas.len();
        self.quotas
            .retain(|_, q| now.saturating_sub(q.window_start_ms) < window_ms);
        self.last_prune_ms = now;
        before - self.quotas.len()
    }
}

/// Quota tracker keyed by `K` (a peer, or a peer and topic pair).
pub struct FloodPreventer<K> {
    config: QuotaConfig,
    time: Arc<dyn TimeSource>,
    windows: Mutex<Windows<K>>,
}

impl<K: Eq + Hash + Clone> FloodPreventer<K> {
    pub fn new(config: QuotaConfig, time: Arc<dyn TimeSource>) -> Self {
        Self {
            config,
            time,
            windows: Mutex::new(Windows {
                quotas: HashMap::new(),
                last_prune_ms: 0,
            }),
        }
    }

    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    /// Add load for `key`. Returns the usage that broke a limit, if any.
    pub fn increase_load(&self, key: &K, messages: u32, bytes: u64) -> Result<(), QuotaUsage> {
        let now = self.time.now_ms();
        let window_ms = self.config.window.as_millis() as u64;
        let mut windows = self.windows.lock();

        if !windows.quotas.contains_key(key)
            && now.saturating_sub(windows.last_prune_ms) >= window_ms
        {
            windows.prune(now, window_ms);
        }

        let quota = windows.quotas.entry(key.clone()).or_insert(Quota {
            window_start_ms: now,
            usage: QuotaUsage {
                messages: 0,
                bytes: 0,
            },
        });

        if now.saturating_sub(quota.window_start_ms) >= window_ms {
            quota.window_start_ms = now;
            quota.usage = QuotaUsage {
                messages: 0,
                bytes: 0,
            };
        }

        quota.usage.messages = quota.usage.messages.saturating_add(messages);
        quota.usage.bytes = quota.usage.bytes.saturating_add(bytes);

        if quota.usage.messages > self.config.max_messages || quota.usage.bytes > self.config.max_bytes
        {
            return Err(quota.usage);
        }
        Ok(())
    }

    /// Usage in the current window, `None` if the key has no live window.
    pub fn usage(&self, key: &K) -> Option<QuotaUsage> {
        let now = self.time.now_ms();
        let window_ms = self.config.window.as_millis() as u64;
        self.windows
            .lock()
            .quotas
            .get(key)
            .filter(|q| now.saturating_sub(q.window_start_ms) < window_ms)
            .map(|q| q.usage)
    }

    /// Drop every window whose time has passed.
    pub fn sweep(&self) -> usize {
        let now = self.time.now_ms();
        let window_ms = self.config.window.as_millis() as u64;
        self.windows.lock().prune(now, window_ms)
    }

    /// Forget all windows.
    pub fn reset(&self) {
        self.windows.lock().quotas.clear();
    }

    pub fn tracked(&self) -> usize {
        self.windows.lock().quotas.len()
    }
}

pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
