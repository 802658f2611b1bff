//! Single-data interceptor: the message payload is one encoded element.
//!
//! For topics that carry bare elements. The node's own gossip topics all
//! carry batches and use the multi-data form.

use std::sync::Arc;

use shared_types::{MessageProcessor, P2pMessage, PeerId, ProcessError};
use sn_telemetry::INTERCEPTED_MESSAGES;

use crate::events::InterceptorError;
use crate::interceptors::common::{outcome_label, InterceptorBuilder, InterceptorCore};
use crate::ports::{InterceptedDebugger, InterceptedHandler, Interceptor};

pub struct SingleDataInterceptor {
    core: InterceptorCore,
}

impl SingleDataInterceptor {
    pub fn builder(topic: impl Into<String>) -> InterceptorBuilder {
        InterceptorBuilder::new(topic)
    }

    pub fn intercept(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), InterceptorError> {
        let core = &self.core;
        let _slot = core.pre_process(message, from_connected_peer)?;

        core.antiflood.can_process_messages_on_topic(
            from_connected_peer,
            &core.topic,
            1,
            message.data.len() as u64,
            message.seq_no,
        )?;

        let debugger = core.debugger();
        core.process_element(0, &message.data, message, from_connected_peer, debugger.as_ref())
    }
}

impl TryFrom<InterceptorBuilder> for SingleDataInterceptor {
    type Error = InterceptorError;

    fn try_from(builder: InterceptorBuilder) -> Result<Self, Self::Error> {
        Ok(Self {
            core: builder.build_core()?,
        })
    }
}

impl InterceptorBuilder {
    pub fn build_single_data(self) -> Result<SingleDataInterceptor, InterceptorError> {
        SingleDataInterceptor::try_from(self)
    }
}

impl MessageProcessor for SingleDataInterceptor {
    fn process_received_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), ProcessError> {
        let result = self.intercept(message, from_connected_peer);
        INTERCEPTED_MESSAGES
            .with_label_values(&[self.core.topic.as_str(), outcome_label(&result)])
            .inc();
        result.map_err(Into::into)
    }
}

impl Interceptor for SingleDataInterceptor {
    fn topic(&self) -> &str {
        &self.core.topic
    }

    fn set_intercepted_debug_handler(&self, handler: Arc<dyn InterceptedDebugger>) {
        self.core.set_debugger(handler);
    }

    fn register_handler(&self, handler: InterceptedHandler) {
        self.core.register_handler(handler);
    }

    fn into_message_processor(self: Arc<Self>) -> Arc<dyn MessageProcessor> {
        self
    }
}
