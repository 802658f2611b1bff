//! Adapters: storers and the messenger-backed resolver sender.

pub mod sender;
pub mod storage;

pub use sender::TopicResolverSender;
pub use storage::{nonce_key, MemoryStorer, StorageService, UnitType};
