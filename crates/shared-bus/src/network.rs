//! # In-Memory Network
//!
//! A hub holding every joined node and the links between them. Messages
//! only travel over links: a node receives a broadcast if it is connected
//! to the sender, has the topic, and has a processor registered on it.
//!
//! No lock is held while a processor runs, so processors may send from
//! inside their callback (a resolver answering a request, for instance).

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{MessageProcessor, P2pMessage, PeerId};
use thiserror::Error;
use tracing::{debug, trace};

use crate::messenger::InMemoryMessenger;

/// How messages reach the receiving processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Run the processor on the sender's call stack.
    #[default]
    Inline,
    /// Spawn one task per delivery on the current tokio runtime; falls back
    /// to inline outside a runtime.
    Spawned,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("peer {0:?} already joined")]
    DuplicatePeer(PeerId),

    #[error("peer {0:?} is not part of the network")]
    UnknownPeer(PeerId),

    #[error("a peer cannot connect to itself")]
    SelfConnection,
}

/// Counters for one node, for tests and the seednode display.
#[derive(Debug, Default)]
pub struct NodeStats {
    pub sent: AtomicU64,
    pub delivered: AtomicU64,
    pub rejected: AtomicU64,
}

/// Per-node state owned by the hub.
pub(crate) struct NodeState {
    pub(crate) address: String,
    pub(crate) topics: RwLock<HashMap<String, Option<Arc<dyn MessageProcessor>>>>,
    pub(crate) seq_no: AtomicU64,
    pub(crate) stats: NodeStats,
}

impl NodeState {
    fn new(address: String) -> Self {
        Self {
            address,
            topics: RwLock::new(HashMap::new()),
            seq_no: AtomicU64::new(0),
            stats: NodeStats::default(),
        }
    }

    pub(crate) fn processor(&self, topic: &str) -> Option<Arc<dyn MessageProcessor>> {
        self.topics.read().get(topic).cloned().flatten()
    }
}

pub struct InMemoryNetwork {
    mode: DeliveryMode,
    nodes: RwLock<HashMap<PeerId, Arc<NodeState>>>,
    links: RwLock<HashMap<PeerId, HashSet<PeerId>>>,
}

impl InMemoryNetwork {
    pub fn new() -> Arc<Self> {
        Self::with_mode(DeliveryMode::Inline)
    }

    pub fn with_mode(mode: DeliveryMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            nodes: RwLock::new(HashMap::new()),
            links: RwLock::new(HashMap::new()),
        })
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Add a node and return its messenger.
    pub fn join(self: &Arc<Self>, peer: PeerId) -> Result<Arc<InMemoryMessenger>, BusError> {
        let address = format!("/memory/{}", peer.short());
        let state = {
            let mut nodes = self.nodes.write();
            if nodes.contains_key(&peer) {
                return Err(BusError::DuplicatePeer(peer));
            }
            let state = Arc::new(NodeState::new(address));
            nodes.insert(peer, Arc::clone(&state));
            state
        };
        self.links.write().entry(peer).or_default();
        debug!(peer_id = %peer, "node joined in-memory network");
        Ok(Arc::new(InMemoryMessenger::new(peer, Arc::clone(self), state)))
    }

    /// Remove a node and every link touching it.
    pub fn leave(&self, peer: &PeerId) -> Result<(), BusError> {
        if self.nodes.write().remove(peer).is_none() {
            return Err(BusError::UnknownPeer(*peer));
        }
        let mut links = self.links.write();
        links.remove(peer);
        for neighbours in links.values_mut() {
            neighbours.remove(peer);
        }
        Ok(())
    }

    /// Create a bidirectional link.
    pub fn connect(&self, first: &PeerId, second: &PeerId) -> Result<(), BusError> {
        if first == second {
            return Err(BusError::SelfConnection);
        }
        {
            let nodes = self.nodes.read();
            for peer in [first, second] {
                if !nodes.contains_key(peer) {
                    return Err(BusError::UnknownPeer(*peer));
                }
            }
        }
        let mut links = self.links.write();
        links.entry(*first).or_default().insert(*second);
        links.entry(*second).or_default().insert(*first);
        Ok(())
    }

    /// Link every pair of joined nodes.
    pub fn connect_all(&self) {
        let peers: Vec<PeerId> = self.nodes.read().keys().copied().collect();
        let mut links = self.links.write();
        for peer in &peers {
            let neighbours = links.entry(*peer).or_default();
            neighbours.extend(peers.iter().filter(|p| *p != peer).copied());
        }
    }

    pub fn disconnect(&self, first: &PeerId, second: &PeerId) {
        let mut links = self.links.write();
        if let Some(neighbours) = links.get_mut(first) {
            neighbours.remove(second);
        }
        if let Some(neighbours) = links.get_mut(second) {
            neighbours.remove(first);
        }
    }

    pub(crate) fn neighbours(&self, peer: &PeerId) -> Vec<PeerId> {
        let mut neighbours: Vec<PeerId> = self
            .links
            .read()
            .get(peer)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        neighbours.sort();
        neighbours
    }

    pub(crate) fn is_linked(&self, first: &PeerId, second: &PeerId) -> bool {
        self.links
            .read()
            .get(first)
            .is_some_and(|set| set.contains(second))
    }

    pub(crate) fn node(&self, peer: &PeerId) -> Option<Arc<NodeState>> {
        self.nodes.read().get(peer).cloned()
    }

    /// Hand `message` to `receiver`'s processor for its topic, if any.
    ///
    /// Returns whether a processor was found.
    pub(crate) fn deliver(&self, receiver: &PeerId, message: P2pMessage, from: PeerId) -> bool {
        let Some(state) = self.node(receiver) else {
            return false;
        };
        let Some(processor) = state.processor(&message.topic) else {
            trace!(peer_id = %receiver, topic = %message.topic, "no processor on topic, message dropped");
            return false;
        };

        match (self.mode, tokio::runtime::Handle::try_current()) {
            (DeliveryMode::Spawned, Ok(handle)) => {
                handle.spawn(async move {
                    run_processor(&state, processor.as_ref(), &message, &from);
                });
            }
            _ => run_processor(&state, processor.as_ref(), &message, &from),
        }
        true
    }
}

fn run_processor(state: &NodeState, processor: &dyn MessageProcessor, message: &P2pMessage, from: &PeerId) {
    match processor.process_received_message(message, from) {
        Ok(()) => {
            state.stats.delivered.fetch_add(1, Ordering::Relaxed);
        }
        Err(err) => {
            state.stats.rejected.fetch_add(1, Ordering::Relaxed);
            debug!(
                topic = %message.topic,
                from = %from.short(),
                error = %err,
                "message rejected by processor"
            );
        }
    }
}
