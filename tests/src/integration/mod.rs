//! # Integration Tests
//!
//! Several `ShardNode`s over one in-memory network.
//!
//! - `admission` - gossip accepted, isolated or dropped by the interceptors
//! - `recovery` - missing data fetched back through the resolvers

pub mod admission;
pub mod recovery;
