//! Topic-bound resolver sender over the `Messenger` port.

use std::sync::Arc;

use rand::seq::SliceRandom;
use shared_types::topics::request_topic;
use shared_types::{Messenger, PeerId};
use sn_telemetry::{RESOLVER_REQUESTS_SENT, RESOLVER_RESPONSES_SENT};
use tracing::{debug, trace};

use crate::domain::RequestData;
use crate::events::ResolverError;
use crate::ports::ResolverSender;

pub struct TopicResolverSender {
    topic: String,
    request_topic: String,
    messenger: Arc<dyn Messenger>,
    num_peers_to_query: usize,
}

impl TopicResolverSender {
    pub fn new(
        topic: impl Into<String>,
        messenger: Arc<dyn Messenger>,
        num_peers_to_query: usize,
    ) -> Result<Self, ResolverError> {
        let topic = topic.into();
        if topic.is_empty() {
            return Err(ResolverError::EmptyTopic);
        }
        if num_peers_to_query == 0 {
            return Err(ResolverError::InvalidConfig(
                "num_peers_to_query must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            request_topic: request_topic(&topic),
            topic,
            messenger,
            num_peers_to_query,
        })
    }

    pub fn request_topic(&self) -> &str {
        &self.request_topic
    }
}

impl ResolverSender for TopicResolverSender {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn send_on_request_topic(&self, request: &RequestData) -> Result<(), ResolverError> {
        let buff = request.encode()?;
        let peers = self.messenger.connected_peers();
        if peers.is_empty() {
            return Err(ResolverError::NoConnectedPeers {
                topic: self.topic.clone(),
            });
        }

        let chosen: Vec<PeerId> = peers
            .choose_multiple(&mut rand::thread_rng(), self.num_peers_to_query)
            .copied()
            .collect();

        let mut sent = 0usize;
        let mut last_error = None;
        for peer in &chosen {
            match self
                .messenger
                .send_to_connected_peer(&self.request_topic, buff.clone(), peer)
            {
                Ok(()) => sent += 1,
                Err(err) => {
                    trace!(topic = %self.request_topic, peer_id = %peer.short(), error = %err, "request send failed");
                    last_error = Some(err);
                }
            }
        }

        if sent == 0 {
            if let Some(err) = last_error {
                return Err(err.into());
            }
        }
        RESOLVER_REQUESTS_SENT
            .with_label_values(&[self.topic.as_str(), request.kind.as_str()])
            .inc();
        debug!(
            topic = %self.request_topic,
            kind = request.kind.as_str(),
            peers = sent,
            "request sent"
        );
        Ok(())
    }

    fn send(&self, data: Vec<u8>, peer: &PeerId) -> Result<(), ResolverError> {
        self.messenger
            .send_to_connected_peer(&self.topic, data, peer)?;
        RESOLVER_RESPONSES_SENT
            .with_label_values(&[self.topic.as_str()])
            .inc();
        Ok(())
    }
}
