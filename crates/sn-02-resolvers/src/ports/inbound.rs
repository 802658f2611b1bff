//! Inbound ports (API) for the resolver subsystem.

use std::sync::Arc;

use shared_types::{Hash, MessageProcessor};

use crate::events::ResolverError;

/// A resolver bound to one base topic.
///
/// As a `MessageProcessor` it is registered on the request channel and
/// answers remote requests; its `request_*` methods ask remote peers for
/// missing data.
pub trait Resolver: MessageProcessor {
    fn topic(&self) -> &str;

    fn request_data_from_hash(&self, hash: &Hash) -> Result<(), ResolverError>;

    fn request_data_from_hash_array(&self, hashes: &[Hash]) -> Result<(), ResolverError>;

    /// Nonce-capable view, present for header resolvers only.
    fn as_header_resolver(&self) -> Option<&dyn HeaderRequester> {
        None
    }

    /// View as the transport-facing processor for registration.
    fn into_message_processor(self: Arc<Self>) -> Arc<dyn MessageProcessor>;
}

/// Header-specific requests.
pub trait HeaderRequester: Send + Sync {
    fn request_data_from_nonce(&self, nonce: u64) -> Result<(), ResolverError>;
}
