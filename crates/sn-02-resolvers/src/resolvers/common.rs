//! Request admission shared by every resolver.

use std::sync::Arc;

use shared_types::topics::INVALID_MESSAGE_BLACKLIST_DURATION;
use shared_types::{Batch, Hash, P2pMessage, PeerId};
use sn_01_interceptors::{AntifloodHandler, InterceptorThrottler, ThrottleGuard};
use sn_telemetry::{RESOLVER_NOT_FOUND, THROTTLE_REJECTIONS};
use tracing::{trace, warn};

use crate::domain::{RequestData, RequestDataKind};
use crate::events::ResolverError;
use crate::ports::ResolverSender;

pub(crate) struct ResolverCore {
    pub(crate) sender: Arc<dyn ResolverSender>,
    antiflood: Arc<dyn AntifloodHandler>,
    throttler: Arc<dyn InterceptorThrottler>,
}

impl ResolverCore {
    pub(crate) fn new(
        sender: Option<Arc<dyn ResolverSender>>,
        antiflood: Option<Arc<dyn AntifloodHandler>>,
        throttler: Option<Arc<dyn InterceptorThrottler>>,
    ) -> Result<Self, ResolverError> {
        let sender = sender.ok_or(ResolverError::MissingCollaborator("resolver sender"))?;
        if sender.topic().is_empty() {
            return Err(ResolverError::EmptyTopic);
        }
        Ok(Self {
            sender,
            antiflood: antiflood.ok_or(ResolverError::MissingCollaborator("antiflood handler"))?,
            throttler: throttler.ok_or(ResolverError::MissingCollaborator("throttler"))?,
        })
    }

    pub(crate) fn topic(&self) -> &str {
        self.sender.topic()
    }

    /// Antiflood and throttler admission, identical to the interceptors'.
    pub(crate) fn pre_process(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<ThrottleGuard<'_>, ResolverError> {
        self.antiflood
            .can_process_message(message, from_connected_peer)?;
        let guard = ThrottleGuard::try_start(self.throttler.as_ref()).ok_or_else(|| {
            THROTTLE_REJECTIONS.with_label_values(&[message.topic.as_str()]).inc();
            ResolverError::SystemBusy
        })?;
        self.antiflood.can_process_messages_on_topic(
            from_connected_peer,
            &message.topic,
            1,
            message.data.len() as u64,
            message.seq_no,
        )?;
        Ok(guard)
    }

    /// Decode the request; undecodable requests blacklist both hops.
    pub(crate) fn parse_request(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<RequestData, ResolverError> {
        RequestData::decode(&message.data).map_err(|source| {
            let reason = format!("unmarshalable request on topic {}", message.topic);
            warn!(topic = %message.topic, peer_id = %message.peer, error = %source, "undecodable request");
            self.antiflood
                .blacklist_peer(&message.peer, &reason, INVALID_MESSAGE_BLACKLIST_DURATION);
            self.antiflood.blacklist_peer(
                from_connected_peer,
                &reason,
                INVALID_MESSAGE_BLACKLIST_DURATION,
            );
            ResolverError::MalformedRequest {
                topic: message.topic.clone(),
                source,
            }
        })
    }

    /// Send found payloads to `peer` as one batch; nothing found sends nothing.
    pub(crate) fn respond_with_batch(
        &self,
        payloads: Vec<Vec<u8>>,
        peer: &PeerId,
    ) -> Result<(), ResolverError> {
        if payloads.is_empty() {
            self.not_found(peer);
            return Ok(());
        }
        let buff = shared_types::codec::encode(&Batch::new(payloads))?;
        self.sender.send(buff, peer)
    }

    pub(crate) fn not_found(&self, peer: &PeerId) {
        RESOLVER_NOT_FOUND.with_label_values(&[self.topic()]).inc();
        trace!(topic = %self.topic(), peer_id = %peer.short(), "requested data not found, no response sent");
    }
}

pub(crate) fn unsupported(request: &RequestData, topic: &str) -> ResolverError {
    ResolverError::UnsupportedRequest {
        kind: request.kind.as_str(),
        topic: topic.to_string(),
    }
}

/// Hashes named by a hash or hash-array request.
pub(crate) fn requested_hashes(request: &RequestData, topic: &str) -> Result<Vec<Hash>, ResolverError> {
    match request.kind {
        RequestDataKind::Hash => Ok(vec![request.hash()?]),
        RequestDataKind::HashArray => Ok(request.hashes()?),
        RequestDataKind::Nonce => Err(unsupported(request, topic)),
    }
}
