//! Time-bounded peer blacklist.
//!
//! Entries are never actively removed on the hot path: a lookup treats an
//! expired entry as absent. `sweep` exists for housekeeping only.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use shared_types::PeerId;

use crate::ports::TimeSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    /// Last instant (ms) at which the peer is still rejected.
    pub expires_at_ms: u64,
    pub reason: String,
}

pub struct PeerBlacklist {
    entries: RwLock<HashMap<PeerId, BlacklistEntry>>,
    time: Arc<dyn TimeSource>,
}

impl PeerBlacklist {
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            time,
        }
    }

    /// Blacklist `peer` for `duration` from now.
    ///
    /// An existing entry keeps whichever expiry is later.
    pub fn add(&self, peer: PeerId, reason: &str, duration: Duration) {
        let expires_at_ms = self
            .time
            .now_ms()
            .saturating_add(duration.as_millis() as u64);
        let mut entries = self.entries.write();
        match entries.get_mut(&peer) {
            Some(entry) if entry.expires_at_ms >= expires_at_ms => {}
            Some(entry) => {
                entry.expires_at_ms = expires_at_ms;
                entry.reason = reason.to_string();
            }
            None => {
                entries.insert(
                    peer,
                    BlacklistEntry {
                        expires_at_ms,
                        reason: reason.to_string(),
                    },
                );
            }
        }
    }

    /// True while `now <= expiry`.
    pub fn contains(&self, peer: &PeerId) -> bool {
        let now = self.time.now_ms();
        self.entries
            .read()
            .get(peer)
            .is_some_and(|entry| now <= entry.expires_at_ms)
    }

    pub fn entry(&self, peer: &PeerId) -> Option<BlacklistEntry> {
        let now = self.time.now_ms();
        self.entries
            .read()
            .get(peer)
            .filter(|entry| now <= entry.expires_at_ms)
            .cloned()
    }

    /// Remove expired entries.
    pub fn sweep(&self) -> usize {
        let now = self.time.now_ms();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| now <= e.expires_at_ms);
        before - entries.len()
    }

    /// Count of live entries.
    pub fn len(&self) -> usize {
        let now = self.time.now_ms();
        self.entries
            .read()
            .values()
            .filter(|e| now <= e.expires_at_ms)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ManualClock;

    fn peer(byte: u8) -> PeerId {
        PeerId::new([byte; 32])
    }

    #[test]
    fn test_rejected_for_full_duration_and_accepted_strictly_after() {
        let clock = Arc::new(ManualClock::new(1_000));
        let blacklist = PeerBlacklist::new(clock.clone());
        blacklist.add(peer(1), "bad data", Duration::from_millis(500));

        assert!(blacklist.contains(&peer(1)));
        clock.set(1_500);
        assert!(blacklist.contains(&peer(1)));
        clock.set(1_501);
        assert!(!blacklist.contains(&peer(1)));
    }

    #[test]
    fn test_refresh_keeps_later_expiry() {
        let clock = Arc::new(ManualClock::new(0));
        let blacklist = PeerBlacklist::new(clock.clone());
        blacklist.add(peer(1), "long", Duration::from_millis(1_000));
        blacklist.add(peer(1), "short", Duration::from_millis(10));
        assert_eq!(blacklist.entry(&peer(1)).unwrap().expires_at_ms, 1_000);
        assert_eq!(blacklist.entry(&peer(1)).unwrap().reason, "long");

        clock.set(900);
        blacklist.add(peer(1), "again", Duration::from_millis(1_000));
        assert_eq!(blacklist.entry(&peer(1)).unwrap().expires_at_ms, 1_900);
    }

    #[test]
    fn test_sweep_removes_expired_only() {
        let clock = Arc::new(ManualClock::new(0));
        let blacklist = PeerBlacklist::new(clock.clone());
        blacklist.add(peer(1), "a", Duration::from_millis(10));
        blacklist.add(peer(2), "b", Duration::from_millis(100));
        clock.set(50);

        assert_eq!(blacklist.len(), 1);
        assert_eq!(blacklist.sweep(), 1);
        assert!(blacklist.contains(&peer(2)));
    }
}
