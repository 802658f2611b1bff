//! Adapters connecting the interceptor ports to node state.

pub mod processors;

pub use processors::PoolProcessor;
