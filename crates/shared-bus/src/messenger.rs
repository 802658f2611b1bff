//! `Messenger` implementation backed by [`InMemoryNetwork`].

use std::sync::atomic::Ordering;
use std::sync::Arc;

use shared_types::{MessageProcessor, Messenger, NetworkError, P2pMessage, PeerId};
use tracing::{debug, trace};

use crate::network::{InMemoryNetwork, NodeState, NodeStats};

/// One node's view of the in-memory network.
pub struct InMemoryMessenger {
    id: PeerId,
    network: Arc<InMemoryNetwork>,
    state: Arc<NodeState>,
}

impl InMemoryMessenger {
    pub(crate) fn new(id: PeerId, network: Arc<InMemoryNetwork>, state: Arc<NodeState>) -> Self {
        Self { id, network, state }
    }

    pub fn stats(&self) -> &NodeStats {
        &self.state.stats
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.state.topics.read().keys().cloned().collect();
        topics.sort();
        topics
    }

    fn next_message(&self, topic: &str, data: Vec<u8>) -> P2pMessage {
        let seq_no = self.state.seq_no.fetch_add(1, Ordering::Relaxed) + 1;
        self.state.stats.sent.fetch_add(1, Ordering::Relaxed);
        P2pMessage::new(topic, data, self.id, seq_no)
    }
}

impl Messenger for InMemoryMessenger {
    fn id(&self) -> PeerId {
        self.id
    }

    fn create_topic(&self, topic: &str) -> Result<(), NetworkError> {
        self.state
            .topics
            .write()
            .entry(topic.to_string())
            .or_insert(None);
        Ok(())
    }

    fn has_topic(&self, topic: &str) -> bool {
        self.state.topics.read().contains_key(topic)
    }

    fn register_message_processor(
        &self,
        topic: &str,
        processor: Arc<dyn MessageProcessor>,
    ) -> Result<(), NetworkError> {
        let mut topics = self.state.topics.write();
        let slot = topics
            .get_mut(topic)
            .ok_or_else(|| NetworkError::UnknownTopic(topic.to_string()))?;
        if slot.is_some() {
            return Err(NetworkError::ProcessorAlreadyRegistered(topic.to_string()));
        }
        *slot = Some(processor);
        debug!(peer_id = %self.id.short(), topic, "message processor registered");
        Ok(())
    }

    fn unregister_message_processor(&self, topic: &str) -> Result<(), NetworkError> {
        let mut topics = self.state.topics.write();
        let slot = topics
            .get_mut(topic)
            .ok_or_else(|| NetworkError::UnknownTopic(topic.to_string()))?;
        *slot = None;
        Ok(())
    }

    fn broadcast(&self, topic: &str, data: Vec<u8>) -> Result<(), NetworkError> {
        if !self.has_topic(topic) {
            return Err(NetworkError::UnknownTopic(topic.to_string()));
        }
        let message = self.next_message(topic, data);
        let mut receivers = 0usize;
        for peer in self.network.neighbours(&self.id) {
            if self.network.deliver(&peer, message.clone(), self.id) {
                receivers += 1;
            }
        }
        trace!(peer_id = %self.id.short(), topic, receivers, "broadcast");
        Ok(())
    }

    fn send_to_connected_peer(
        &self,
        topic: &str,
        data: Vec<u8>,
        peer: &PeerId,
    ) -> Result<(), NetworkError> {
        if !self.network.is_linked(&self.id, peer) {
            return Err(NetworkError::PeerNotConnected(peer.to_string()));
        }
        let message = self.next_message(topic, data);
        if !self.network.deliver(peer, message, self.id) {
            trace!(peer_id = %peer.short(), topic, "direct send dropped, no processor on peer");
        }
        Ok(())
    }

    fn connected_peers(&self) -> Vec<PeerId> {
        self.network.neighbours(&self.id)
    }

    fn addresses(&self) -> Vec<String> {
        vec![self.state.address.clone()]
    }

    fn connected_addresses(&self) -> Vec<String> {
        self.network
            .neighbours(&self.id)
            .iter()
            .filter_map(|peer| self.network.node(peer))
            .map(|state| state.address.clone())
            .collect()
    }
}
