//! Error types for the interceptor subsystem.

use shared_types::{CodecError, NetworkError, PeerId, RegistryError, ShardId};
use thiserror::Error;

/// Errors returned by interceptors.
///
/// Construction errors (`EmptyTopic`, `MissingCollaborator`, `InvalidConfig`,
/// `Registry`, `Network`) surface from builders and containers only. The
/// rest are produced while processing a message.
#[derive(Debug, Error)]
pub enum InterceptorError {
    #[error("empty topic")]
    EmptyTopic,

    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Duplicate or missing interceptor in a container.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Topic creation or processor registration failed.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Peer blacklisted or over quota.
    #[error(transparent)]
    Antiflood(#[from] AntifloodError),

    /// Throttler has no free slot.
    #[error("system busy")]
    SystemBusy,

    /// Payload is not a batch; the whole message is void.
    #[error("malformed envelope on topic {topic}: {source}")]
    MalformedEnvelope {
        topic: String,
        #[source]
        source: CodecError,
    },

    #[error("no data in message")]
    NoDataInMessage,

    /// A single batch element could not be decoded.
    #[error("element {index}: cannot create intercepted data: {source}")]
    Factory {
        index: usize,
        #[source]
        source: FactoryError,
    },

    /// A single batch element decoded but is structurally invalid.
    #[error("element {index}: invalid data: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// The processor refused to commit an element.
    #[error("element {index}: processor: {source}")]
    Processor {
        index: usize,
        #[source]
        source: ProcessorError,
    },
}

/// Antiflood rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AntifloodError {
    #[error("peer {0:?} is blacklisted")]
    Blacklisted(PeerId),

    #[error("peer {peer:?} over quota: {messages} messages, {bytes} bytes")]
    PeerQuotaExceeded {
        peer: PeerId,
        messages: u32,
        bytes: u64,
    },

    #[error("peer {peer:?} over quota on topic {topic}: {messages} messages, {bytes} bytes")]
    TopicQuotaExceeded {
        peer: PeerId,
        topic: String,
        messages: u32,
        bytes: u64,
    },
}

/// Failures turning raw bytes into intercepted data.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("decode: {0}")]
    Decode(#[source] CodecError),

    #[error("hashing: {0}")]
    Hashing(#[source] CodecError),
}

/// Structural validity failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("missing signature")]
    MissingSignature,

    #[error("gas limit is zero")]
    ZeroGasLimit,

    #[error("chain id mismatch")]
    ChainIdMismatch,

    #[error("invalid shard id {0}")]
    InvalidShardId(ShardId),

    #[error("{0} is empty")]
    Empty(&'static str),
}

/// Errors reported by an `InterceptorProcessor`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("wrong data kind: {0}")]
    WrongKind(&'static str),
}
