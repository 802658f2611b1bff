//! Multi-data interceptor: one message carries a `Batch` of elements.
//!
//! The envelope is all-or-nothing (an undecodable batch voids the message
//! and blacklists both hops); elements inside a valid batch succeed or fail
//! independently and the last element error is returned.

use std::sync::Arc;

use shared_types::{codec, Batch, MessageProcessor, P2pMessage, PeerId, ProcessError};
use sn_telemetry::INTERCEPTED_MESSAGES;
use tracing::warn;

use crate::events::InterceptorError;
use crate::interceptors::common::{outcome_label, InterceptorBuilder, InterceptorCore};
use crate::ports::{InterceptedDebugger, InterceptedHandler, Interceptor};

pub struct MultiDataInterceptor {
    core: InterceptorCore,
}

impl MultiDataInterceptor {
    pub fn builder(topic: impl Into<String>) -> InterceptorBuilder {
        InterceptorBuilder::new(topic)
    }

    /// Run the admission pipeline for one message.
    pub fn intercept(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), InterceptorError> {
        let core = &self.core;
        let _slot = core.pre_process(message, from_connected_peer)?;

        let batch: Batch = match codec::decode(&message.data) {
            Ok(batch) => batch,
            Err(source) => {
                let reason = format!("unmarshalable data got on topic {}", core.topic);
                warn!(topic = %core.topic, peer_id = %message.peer, error = %source, "undecodable batch");
                core.blacklist_both(message, from_connected_peer, &reason);
                return Err(InterceptorError::MalformedEnvelope {
                    topic: core.topic.clone(),
                    source,
                });
            }
        };
        if batch.is_empty() {
            return Err(InterceptorError::NoDataInMessage);
        }

        core.antiflood.can_process_messages_on_topic(
            from_connected_peer,
            &core.topic,
            batch.len() as u32,
            message.data.len() as u64,
            message.seq_no,
        )?;

        let debugger = core.debugger();
        let mut last_error = None;
        for (index, buff) in batch.data.iter().enumerate() {
            if let Err(err) =
                core.process_element(index, buff, message, from_connected_peer, debugger.as_ref())
            {
                last_error = Some(err);
            }
        }

        match last_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl TryFrom<InterceptorBuilder> for MultiDataInterceptor {
    type Error = InterceptorError;

    fn try_from(builder: InterceptorBuilder) -> Result<Self, Self::Error> {
        Ok(Self {
            core: builder.build_core()?,
        })
    }
}

impl InterceptorBuilder {
    pub fn build_multi_data(self) -> Result<MultiDataInterceptor, InterceptorError> {
        MultiDataInterceptor::try_from(self)
    }
}

impl MessageProcessor for MultiDataInterceptor {
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

impl Interceptor for MultiDataInterceptor {
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
