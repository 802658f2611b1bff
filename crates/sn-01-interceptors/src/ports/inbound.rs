//! Inbound ports (API) for the interceptor subsystem.

use std::sync::Arc;

use shared_types::{Hash, MessageProcessor};

use crate::domain::InterceptedData;
use crate::ports::InterceptedDebugger;

/// Callback run after an element was committed by the processor.
///
/// Arguments: topic, data hash, data.
pub type InterceptedHandler = Arc<dyn Fn(&str, &Hash, &InterceptedData) + Send + Sync>;

/// An interceptor bound to one topic.
///
/// The transport calls `process_received_message` (from
/// `MessageProcessor`) once per inbound message, possibly from many tasks
/// at once.
pub trait Interceptor: MessageProcessor {
    /// Topic this interceptor is registered on.
    fn topic(&self) -> &str;

    /// Replace the debug handler. Readers never observe a half-swapped
    /// handler.
    fn set_intercepted_debug_handler(&self, handler: Arc<dyn InterceptedDebugger>);

    /// Register a callback fired for every committed element.
    fn register_handler(&self, handler: InterceptedHandler);

    /// View as the transport-facing processor for registration.
    fn into_message_processor(self: Arc<Self>) -> Arc<dyn MessageProcessor>;
}
