//! Outbound ports (SPI) for the resolver subsystem.

use shared_types::PeerId;

use crate::domain::RequestData;
use crate::events::{ResolverError, StorageError};

/// Persistent key-value store for one storage unit.
pub trait Storer: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StorageError>;

    fn has(&self, key: &[u8]) -> Result<bool, StorageError>;
}

/// Transport side of a resolver, bound to one base topic.
///
/// Requests go out on the request channel of the topic; responses go back on
/// the base topic so that the requester's interceptor ingests them.
pub trait ResolverSender: Send + Sync {
    /// Base topic this sender serves.
    fn topic(&self) -> &str;

    /// Encode `request` and send it to a selection of connected peers.
    fn send_on_request_topic(&self, request: &RequestData) -> Result<(), ResolverError>;

    /// Send a response payload to `peer` on the base topic.
    fn send(&self, data: Vec<u8>, peer: &PeerId) -> Result<(), ResolverError>;
}
