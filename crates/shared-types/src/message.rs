//! # Transport Boundary
//!
//! The message envelope delivered on a topic, the batch payload carried by
//! multi-data topics, and the two traits at the transport seam: the
//! `Messenger` (outbound) and the `MessageProcessor` (inbound callback).

use std::error::Error;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::entities::PeerId;
use crate::errors::NetworkError;

/// A message received on a topic. Immutable once received.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct P2pMessage {
    pub topic: String,
    #[serde_as(as = "Bytes")]
    pub data: Vec<u8>,
    /// Peer that first broadcast the message.
    pub peer: PeerId,
    /// Originator's sequence number.
    pub seq_no: u64,
}

impl P2pMessage {
    pub fn new(topic: impl Into<String>, data: Vec<u8>, peer: PeerId, seq_no: u64) -> Self {
        Self {
            topic: topic.into(),
            data,
            peer,
            seq_no,
        }
    }
}

/// Ordered list of raw payloads carried in one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Batch {
    pub data: Vec<Vec<u8>>,
}

impl Batch {
    pub fn new(data: Vec<Vec<u8>>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Error type crossing the transport callback boundary.
pub type ProcessError = Box<dyn Error + Send + Sync>;

/// Callback invoked by the transport for every message on a topic.
///
/// Implementations must be safe to call from many tasks at once.
pub trait MessageProcessor: Send + Sync {
    fn process_received_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), ProcessError>;
}

/// Outbound side of the transport.
///
/// Sends are fire-and-forget: returning `Ok` means the message was handed
/// to the transport, not that the remote processed it.
pub trait Messenger: Send + Sync {
    /// This node's peer id.
    fn id(&self) -> PeerId;

    fn create_topic(&self, topic: &str) -> Result<(), NetworkError>;

    fn has_topic(&self, topic: &str) -> bool;

    /// Attach the processor receiving every message on `topic`.
    fn register_message_processor(
        &self,
        topic: &str,
        processor: Arc<dyn MessageProcessor>,
    ) -> Result<(), NetworkError>;

    fn unregister_message_processor(&self, topic: &str) -> Result<(), NetworkError>;

    /// Publish `data` to every peer subscribed to `topic`.
    fn broadcast(&self, topic: &str, data: Vec<u8>) -> Result<(), NetworkError>;

    /// Send `data` on `topic` to a single connected peer.
    fn send_to_connected_peer(
        &self,
        topic: &str,
        data: Vec<u8>,
        peer: &PeerId,
    ) -> Result<(), NetworkError>;

    fn connected_peers(&self) -> Vec<PeerId>;

    /// Addresses this node listens on.
    fn addresses(&self) -> Vec<String>;

    /// Addresses of the currently connected peers.
    fn connected_addresses(&self) -> Vec<String>;
}
