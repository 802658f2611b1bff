//! Domain layer: pools, nonce index and the request wire format.

pub mod cache;
pub mod nonce_index;
pub mod pool;
pub mod request;

pub use cache::{AddedHandler, BoundedCache};
pub use nonce_index::NonceHashIndex;
pub use pool::{DataPool, PoolConfig};
pub use request::{RequestData, RequestDataKind};
