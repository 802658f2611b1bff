//! Antiflood handler.
//!
//! Combines a per-peer quota, a per-(peer, topic) quota and the peer
//! blacklist behind the `AntifloodHandler` port.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::{P2pMessage, PeerId};
use sn_telemetry::{log_peer_event, ANTIFLOOD_REJECTIONS, PEERS_BLACKLISTED};
use tracing::debug;

use crate::domain::quota::duration_ms;
use crate::domain::{FloodPreventer, PeerBlacklist, QuotaConfig};
use crate::events::AntifloodError;
use crate::ports::{AntifloodHandler, TimeSource};

/// Quota limits for both preventers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntifloodConfig {
    /// Whole messages received from one peer.
    pub peer: QuotaConfig,
    /// Elements received from one peer on one topic.
    pub topic: QuotaConfig,
    /// Period of the background sweep of elapsed windows and expired bans.
    /// Zero disables it.
    #[serde(with = "duration_ms")]
    pub sweep_interval: Duration,
}

impl Default for AntifloodConfig {
    fn default() -> Self {
        Self {
            peer: QuotaConfig::new(200, 2 * 1024 * 1024, Duration::from_secs(1)),
            topic: QuotaConfig::new(1_000, 2 * 1024 * 1024, Duration::from_secs(1)),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

pub struct P2pAntiflood {
    peer_preventer: FloodPreventer<PeerId>,
    topic_preventer: FloodPreventer<(PeerId, String)>,
    blacklist: PeerBlacklist,
}

impl P2pAntiflood {
    pub fn new(config: AntifloodConfig, time: Arc<dyn TimeSource>) -> Self {
        Self {
            peer_preventer: FloodPreventer::new(config.peer, Arc::clone(&time)),
            topic_preventer: FloodPreventer::new(config.topic, Arc::clone(&time)),
            blacklist: PeerBlacklist::new(time),
        }
    }

    pub fn blacklist(&self) -> &PeerBlacklist {
        &self.blacklist
    }

    /// Forget every quota window.
    pub fn reset_windows(&self) {
        self.peer_preventer.reset();
        self.topic_preventer.reset();
    }

    /// Drop elapsed windows and expired blacklist entries.
    pub fn sweep(&self) -> usize {
        self.peer_preventer.sweep() + self.topic_preventer.sweep() + self.blacklist.sweep()
    }

    /// Quota windows currently held, peer and (peer, topic) together.
    pub fn tracked_windows(&self) -> usize {
        self.peer_preventer.tracked() + self.topic_preventer.tracked()
    }

    fn check_blacklist(&self, peer: &PeerId) -> Result<(), AntifloodError> {
        if self.blacklist.contains(peer) {
            ANTIFLOOD_REJECTIONS.with_label_values(&["blacklisted"]).inc();
            return Err(AntifloodError::Blacklisted(*peer));
        }
        Ok(())
    }

    fn increase_peer_load(&self, peer: &PeerId, size: u64) -> Result<(), AntifloodError> {
        self.peer_preventer
            .increase_load(peer, 1, size)
            .map_err(|usage| {
                ANTIFLOOD_REJECTIONS.with_label_values(&["peer_quota"]).inc();
                AntifloodError::PeerQuotaExceeded {
                    peer: *peer,
                    messages: usage.messages,
                    bytes: usage.bytes,
                }
            })
    }
}

impl AntifloodHandler for P2pAntiflood {
    fn can_process_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), AntifloodError> {
        self.check_blacklist(from_connected_peer)?;
        self.check_blacklist(&message.peer)?;

        let size = message.data.len() as u64;
        self.increase_peer_load(from_connected_peer, size)?;
        if message.peer != *from_connected_peer {
            self.increase_peer_load(&message.peer, size)?;
        }
        Ok(())
    }

    fn can_process_messages_on_topic(
        &self,
        peer: &PeerId,
        topic: &str,
        num_messages: u32,
        total_size: u64,
        seq_no: u64,
    ) -> Result<(), AntifloodError> {
        self.topic_preventer
            .increase_load(&(*peer, topic.to_string()), num_messages, total_size)
            .map_err(|usage| {
                ANTIFLOOD_REJECTIONS.with_label_values(&["topic_quota"]).inc();
                debug!(
                    peer_id = %peer,
                    topic,
                    seq_no,
                    messages = usage.messages,
                    bytes = usage.bytes,
                    "topic quota exceeded"
                );
                AntifloodError::TopicQuotaExceeded {
                    peer: *peer,
                    topic: topic.to_string(),
                    messages: usage.messages,
                    bytes: usage.bytes,
                }
            })
    }

    fn blacklist_peer(&self, peer: &PeerId, reason: &str, duration: Duration) {
        self.blacklist.add(*peer, reason, duration);
        PEERS_BLACKLISTED.inc();
        log_peer_event!(
            warn,
            "antiflood",
            "peer blacklisted",
            peer,
            reason,
            duration_secs = duration.as_secs()
        );
    }

    fn is_blacklisted(&self, peer: &PeerId) -> bool {
        self.blacklist.contains(peer)
    }
}
