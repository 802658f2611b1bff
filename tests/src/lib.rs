//! # Shardnet Test Suite
//!
//! Unified test crate running several nodes over the in-memory network.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Chain data builders, node clusters
//! │
//! ├── exploits/         # Attack simulations
//! │   ├── flooding.rs   # Quota exhaustion, relayed floods
//! │   └── malformed.rs  # Undecodable payloads and requests
//! │
//! └── integration/      # Cross-node flows
//!     ├── admission.rs  # Gossip through the interceptors
//!     └── recovery.rs   # Request/response through the resolvers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sn-tests
//!
//! # By category
//! cargo test -p sn-tests integration::
//! cargo test -p sn-tests exploits::
//! ```

#![allow(dead_code)]

pub mod exploits;
pub mod fixtures;
pub mod integration;
