//! Gossip topic names.
//!
//! Shard-scoped topics are the base name followed by a communication
//! identifier (see [`crate::sharding`]). Requests for a topic travel on the
//! same name with [`REQUEST_TOPIC_SUFFIX`] appended.

use std::time::Duration;

/// Transactions, per shard pair.
pub const TRANSACTION_TOPIC: &str = "transactions";

/// Miniblocks (block bodies), per shard pair.
pub const MINI_BLOCKS_TOPIC: &str = "txBlockBodies";

/// Shard headers, between a shard and the metachain.
pub const SHARD_BLOCKS_TOPIC: &str = "shardBlocks";

/// Metachain headers, one global topic.
pub const METACHAIN_BLOCKS_TOPIC: &str = "metachainBlocks";

pub const REQUEST_TOPIC_SUFFIX: &str = "_REQUEST";

/// How long a peer stays blacklisted after sending undecodable data.
pub const INVALID_MESSAGE_BLACKLIST_DURATION: Duration = Duration::from_secs(60 * 60);

/// Name of the request channel for `topic`.
pub fn request_topic(topic: &str) -> String {
    format!("{topic}{REQUEST_TOPIC_SUFFIX}")
}

/// Base topic of a request channel, if `topic` is one.
pub fn base_of_request_topic(topic: &str) -> Option<&str> {
    topic.strip_suffix(REQUEST_TOPIC_SUFFIX)
}
