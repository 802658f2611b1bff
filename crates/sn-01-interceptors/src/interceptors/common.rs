//! Shared machinery for single-data and multi-data interceptors.

use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::topics::INVALID_MESSAGE_BLACKLIST_DURATION;
use shared_types::{P2pMessage, PeerId};
use sn_telemetry::{log_intercept_event, INTERCEPTED_ELEMENTS, THROTTLE_REJECTIONS};
use tracing::{debug, trace};

use crate::domain::{DisabledDebugger, InterceptedData, InterceptedDataFactory, ThrottleGuard};
use crate::events::InterceptorError;
use crate::ports::{
    AntifloodHandler, InterceptedDebugger, InterceptedHandler, InterceptorProcessor,
    InterceptorThrottler, WhiteListHandler,
};

// =============================================================================
// CORE
// =============================================================================

/// State and collaborators common to both interceptor forms.
pub(crate) struct InterceptorCore {
    pub(crate) topic: String,
    factory: Arc<dyn InterceptedDataFactory>,
    processor: Arc<dyn InterceptorProcessor>,
    throttler: Arc<dyn InterceptorThrottler>,
    pub(crate) antiflood: Arc<dyn AntifloodHandler>,
    whitelist: Arc<dyn WhiteListHandler>,
    debugger: RwLock<Arc<dyn InterceptedDebugger>>,
    handlers: RwLock<Vec<InterceptedHandler>>,
}

impl InterceptorCore {
    /// Ingress: antiflood entry check, then a throttler slot.
    ///
    /// A full throttler rejects without consuming a slot.
    pub(crate) fn pre_process(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<ThrottleGuard<'_>, InterceptorError> {
        if message.data.is_empty() {
            return Err(InterceptorError::NoDataInMessage);
        }
        self.antiflood
            .can_process_message(message, from_connected_peer)?;

        ThrottleGuard::try_start(self.throttler.as_ref()).ok_or_else(|| {
            THROTTLE_REJECTIONS.with_label_values(&[self.topic.as_str()]).inc();
            InterceptorError::SystemBusy
        })
    }

    /// Blacklist the originator and the connected peer.
    pub(crate) fn blacklist_both(&self, message: &P2pMessage, from_connected_peer: &PeerId, reason: &str) {
        self.antiflood
            .blacklist_peer(&message.peer, reason, INVALID_MESSAGE_BLACKLIST_DURATION);
        self.antiflood
            .blacklist_peer(from_connected_peer, reason, INVALID_MESSAGE_BLACKLIST_DURATION);
    }

    /// Current debug handler. The read lock is held only for the clone.
    pub(crate) fn debugger(&self) -> Arc<dyn InterceptedDebugger> {
        self.debugger.read().clone()
    }

    pub(crate) fn set_debugger(&self, handler: Arc<dyn InterceptedDebugger>) {
        *self.debugger.write() = handler;
    }

    pub(crate) fn register_handler(&self, handler: InterceptedHandler) {
        self.handlers.write().push(handler);
    }

    /// Decode, validate, filter and commit one element.
    ///
    /// Returns `Ok` for committed and for silently dropped elements.
    pub(crate) fn process_element(
        &self,
        index: usize,
        buff: &[u8],
        message: &P2pMessage,
        from_connected_peer: &PeerId,
        debugger: &dyn InterceptedDebugger,
    ) -> Result<(), InterceptorError> {
        let data = match self.factory.create(buff) {
            Ok(data) => data,
            Err(source) => {
                let reason = format!("can not create object from received bytes, topic {}", self.topic);
                self.blacklist_both(message, from_connected_peer, &reason);
                self.count_element("malformed");
                return Err(InterceptorError::Factory { index, source });
            }
        };
        debugger.log_received(&self.topic, &data);

        if let Err(source) = data.check_validity() {
            let err = InterceptorError::Validation { index, source };
            debugger.log_processed(&self.topic, &data, Some(&err));
            self.count_element("invalid");
            debug!(topic = %self.topic, hash = %data.hash_hex(), error = %err, "intercepted data is invalid");
            return Err(err);
        }

        let is_for_current_shard = data.is_for_current_shard();
        let is_whitelisted = self.whitelist.is_whitelisted(&data);
        if !is_for_current_shard && !is_whitelisted {
            self.count_element("irrelevant");
            trace!(
                topic = %self.topic,
                peer_id = %message.peer,
                seq_no = message.seq_no,
                hash = %data.hash_hex(),
                is_for_current_shard,
                is_whitelisted,
                "intercepted data should not be processed"
            );
            return Ok(());
        }

        self.commit(index, &data, from_connected_peer, debugger)
    }

    fn commit(
        &self,
        index: usize,
        data: &InterceptedData,
        from_connected_peer: &PeerId,
        debugger: &dyn InterceptedDebugger,
    ) -> Result<(), InterceptorError> {
        let result = self
            .processor
            .validate(data, from_connected_peer)
            .and_then(|()| self.processor.save(data, from_connected_peer, &self.topic));

        match result {
            Ok(()) => {
                debugger.log_processed(&self.topic, data, None);
                self.count_element("committed");
                log_intercept_event!(
                    debug,
                    "intercepted data committed",
                    self.topic,
                    from_connected_peer,
                    data.hash_hex()
                );
                let handlers = self.handlers.read().clone();
                for handler in handlers {
                    handler(&self.topic, data.hash(), data);
                }
                Ok(())
            }
            Err(source) => {
                let err = InterceptorError::Processor { index, source };
                debugger.log_processed(&self.topic, data, Some(&err));
                self.count_element("failed");
                Err(err)
            }
        }
    }

    fn count_element(&self, outcome: &str) {
        INTERCEPTED_ELEMENTS
            .with_label_values(&[self.topic.as_str(), outcome])
            .inc();
    }
}

/// Label for the per-message outcome counter.
pub(crate) fn outcome_label(result: &Result<(), InterceptorError>) -> &'static str {
    match result {
        Ok(()) => "accepted",
        Err(InterceptorError::Factory { .. })
        | Err(InterceptorError::Validation { .. })
        | Err(InterceptorError::Processor { .. }) => "partial",
        Err(InterceptorError::MalformedEnvelope { .. }) | Err(InterceptorError::NoDataInMessage) => {
            "aborted"
        }
        Err(_) => "rejected",
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder shared by both interceptor forms.
///
/// Every collaborator is required; `build_*` fails with
/// `MissingCollaborator` naming the first one absent.
#[derive(Default)]
pub struct InterceptorBuilder {
    topic: String,
    factory: Option<Arc<dyn InterceptedDataFactory>>,
    processor: Option<Arc<dyn InterceptorProcessor>>,
    throttler: Option<Arc<dyn InterceptorThrottler>>,
    antiflood: Option<Arc<dyn AntifloodHandler>>,
    whitelist: Option<Arc<dyn WhiteListHandler>>,
}

impl InterceptorBuilder {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn factory(mut self, factory: Arc<dyn InterceptedDataFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn processor(mut self, processor: Arc<dyn InterceptorProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn throttler(mut self, throttler: Arc<dyn InterceptorThrottler>) -> Self {
        self.throttler = Some(throttler);
        self
    }

    pub fn antiflood(mut self, antiflood: Arc<dyn AntifloodHandler>) -> Self {
        self.antiflood = Some(antiflood);
        self
    }

    pub fn whitelist(mut self, whitelist: Arc<dyn WhiteListHandler>) -> Self {
        self.whitelist = Some(whitelist);
        self
    }

    pub(crate) fn build_core(self) -> Result<InterceptorCore, InterceptorError> {
        if self.topic.is_empty() {
            return Err(InterceptorError::EmptyTopic);
        }
        Ok(InterceptorCore {
            topic: self.topic,
            factory: self
                .factory
                .ok_or(InterceptorError::MissingCollaborator("factory"))?,
            processor: self
                .processor
                .ok_or(InterceptorError::MissingCollaborator("processor"))?,
            throttler: self
                .throttler
                .ok_or(InterceptorError::MissingCollaborator("throttler"))?,
            antiflood: self
                .antiflood
                .ok_or(InterceptorError::MissingCollaborator("antiflood handler"))?,
            whitelist: self
                .whitelist
                .ok_or(InterceptorError::MissingCollaborator("whitelist handler"))?,
            debugger: RwLock::new(Arc::new(DisabledDebugger)),
            handlers: RwLock::new(Vec::new()),
        })
    }
}
