//! Error types for the resolver subsystem.

use shared_types::{CodecError, NetworkError, RegistryError};
use sn_01_interceptors::AntifloodError;
use thiserror::Error;

/// Errors returned by resolvers, the resolver sender and the finder.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("empty topic")]
    EmptyTopic,

    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Requesting peer blacklisted or over quota.
    #[error(transparent)]
    Antiflood(#[from] AntifloodError),

    #[error("system busy")]
    SystemBusy,

    /// The request payload is not a `RequestData`.
    #[error("malformed request on topic {topic}: {source}")]
    MalformedRequest {
        topic: String,
        #[source]
        source: CodecError,
    },

    #[error("request kind {kind} not supported on topic {topic}")]
    UnsupportedRequest { kind: &'static str, topic: String },

    #[error("no connected peers to request {topic} from")]
    NoConnectedPeers { topic: String },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("no resolver for topic {0}")]
    ResolverNotFound(String),
}

/// Persistent store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("no storer for unit {0}")]
    UnknownUnit(&'static str),

    #[error("storer unavailable: {0}")]
    Unavailable(String),
}
