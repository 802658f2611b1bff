//! # Error Types
//!
//! Defines error types shared by the interceptor and resolver crates.

use thiserror::Error;

/// Errors produced by the wire codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Nothing to decode.
    #[error("empty input")]
    EmptyInput,

    /// Bytes are not a valid encoding of the requested type.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Value could not be encoded (size limit, unsupported shape).
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Errors raised by a `Messenger` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("topic {0} does not exist")]
    UnknownTopic(String),

    #[error("topic {0} already has a message processor")]
    ProcessorAlreadyRegistered(String),

    #[error("peer {0} is not connected")]
    PeerNotConnected(String),

    #[error("no connected peers")]
    NoConnectedPeers,

    #[error("transport closed")]
    Closed,
}

/// Errors raised when building a `ShardCoordinator`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShardingError {
    #[error("number of shards must be greater than zero")]
    ZeroShards,

    #[error("self shard id {self_id} is out of range for {num_shards} shards")]
    InvalidSelfId { self_id: u32, num_shards: u32 },
}

/// Errors raised by the keyed `Registry`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("key {0} is already registered")]
    Duplicate(String),

    #[error("key {0} is not registered")]
    NotFound(String),
}
