//! Outbound ports (SPI) for the interceptor subsystem.

use std::time::Duration;

use shared_types::{P2pMessage, PeerId};

use crate::domain::InterceptedData;
use crate::events::{AntifloodError, InterceptorError, ProcessorError};

/// Wall clock in milliseconds. Injected so windows and expiries can be
/// driven by tests.
pub trait TimeSource: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Bounded concurrency gate for in-flight message processing.
///
/// A full throttler is a backpressure signal: callers drop the message
/// instead of waiting.
pub trait InterceptorThrottler: Send + Sync {
    fn can_process(&self) -> bool;
    fn start_processing(&self);
    fn end_processing(&self);

    /// Take a slot if one is free. Returns `false` without taking one
    /// otherwise.
    fn try_start_processing(&self) -> bool {
        if !self.can_process() {
            return false;
        }
        self.start_processing();
        true
    }
}

/// Per-peer and per-topic quotas plus a time-bounded blacklist.
pub trait AntifloodHandler: Send + Sync {
    /// Ingress check for a whole message: blacklist and per-peer quota for
    /// both the connected peer and the originator.
    fn can_process_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), AntifloodError>;

    /// Quota check for `num_messages` elements totalling `total_size` bytes
    /// on `topic`.
    fn can_process_messages_on_topic(
        &self,
        peer: &PeerId,
        topic: &str,
        num_messages: u32,
        total_size: u64,
        seq_no: u64,
    ) -> Result<(), AntifloodError>;

    /// Insert or refresh a blacklist entry.
    fn blacklist_peer(&self, peer: &PeerId, reason: &str, duration: Duration);

    fn is_blacklisted(&self, peer: &PeerId) -> bool;
}

/// Explicit allow-list overriding the shard-relevance filter.
pub trait WhiteListHandler: Send + Sync {
    fn is_whitelisted(&self, data: &InterceptedData) -> bool;
}

/// Sink committing accepted data into shared pools.
pub trait InterceptorProcessor: Send + Sync {
    /// Business checks that need node state (e.g. the pool).
    fn validate(&self, data: &InterceptedData, from: &PeerId) -> Result<(), ProcessorError>;

    /// Commit the data.
    fn save(&self, data: &InterceptedData, from: &PeerId, topic: &str)
        -> Result<(), ProcessorError>;
}

/// Instrumentation hook for intercepted data.
pub trait InterceptedDebugger: Send + Sync {
    /// Data decoded from the wire, before validity checks.
    fn log_received(&self, topic: &str, data: &InterceptedData);

    /// Final outcome for the data: `None` means committed.
    fn log_processed(&self, topic: &str, data: &InterceptedData, error: Option<&InterceptorError>);

    fn is_enabled(&self) -> bool;
}
