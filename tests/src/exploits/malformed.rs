//! # Malformed Payload Attacks
//!
//! Bytes that cannot be decoded are treated as deliberate misbehaviour:
//! both the originator and the connected peer that delivered them are
//! blacklisted for `INVALID_MESSAGE_BLACKLIST_DURATION`. Structurally
//! decodable but invalid data is not, so honest peers relaying stale or
//! foreign data are never banned.

#[cfg(test)]
mod tests {
    use shared_types::topics::{request_topic, INVALID_MESSAGE_BLACKLIST_DURATION, METACHAIN_BLOCKS_TOPIC};
    use shared_types::{Messenger, P2pMessage};
    use sn_01_interceptors::{AntifloodConfig, AntifloodError, InterceptorError};
    use sn_02_resolvers::RequestData;

    use crate::fixtures::*;

    #[test]
    fn test_garbage_batch_bans_sender_on_every_topic() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (attacker, victim) = (cluster.node(0), cluster.node(1));

        attacker
            .messenger
            .broadcast("transactions_0", truncated(batch(&[transaction(1, 0, 0)])))
            .unwrap();
        assert!(victim.is_blacklisted(&attacker.id()));

        // the ban is per peer, not per topic
        let header = meta_header(1);
        attacker
            .messenger
            .broadcast(METACHAIN_BLOCKS_TOPIC, batch(&[header.clone()]))
            .unwrap();
        assert!(!victim.node.pool().meta_headers().has(&hash(&header)));

        cluster
            .clock
            .advance(INVALID_MESSAGE_BLACKLIST_DURATION.as_millis() as u64 + 1);
        assert!(!victim.is_blacklisted(&attacker.id()));
        attacker
            .messenger
            .broadcast(METACHAIN_BLOCKS_TOPIC, batch(&[header.clone()]))
            .unwrap();
        assert!(victim.node.pool().meta_headers().has(&hash(&header)));
    }

    #[test]
    fn test_blacklist_holds_until_last_millisecond() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (attacker, victim) = (cluster.node(0), cluster.node(1));
        attacker
            .messenger
            .broadcast(METACHAIN_BLOCKS_TOPIC, truncated(batch(&[meta_header(1)])))
            .unwrap();

        cluster
            .clock
            .advance(INVALID_MESSAGE_BLACKLIST_DURATION.as_millis() as u64);
        assert!(victim.is_blacklisted(&attacker.id()));
        cluster.clock.advance(1);
        assert!(!victim.is_blacklisted(&attacker.id()));
    }

    #[test]
    fn test_undecodable_element_bans_but_keeps_siblings() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (attacker, victim) = (cluster.node(0), cluster.node(1));
        let good = transaction(1, 0, 0);
        let elements = vec![
            encoded(&good),
            encoded(&transaction(2, 0, 0))[..12].to_vec(),
        ];

        attacker
            .messenger
            .broadcast("transactions_0", encoded(&shared_types::Batch::new(elements)))
            .unwrap();

        assert!(victim.node.pool().transactions().has(&hash(&good)));
        assert_eq!(victim.node.pool().transactions().len(), 1);
        assert!(victim.is_blacklisted(&attacker.id()));
    }

    #[test]
    fn test_relay_of_garbage_bans_relay_and_originator() {
        let harness = InterceptorHarness::new(10, AntifloodConfig::default());
        let (originator, relay, honest) = (peer(0xA0), peer(1), peer(2));
        let garbage = P2pMessage::new(
            InterceptorHarness::TOPIC,
            truncated(batch(&[transaction(1, 0, 0)])),
            originator,
            1,
        );

        let result = harness.interceptor.intercept(&garbage, &relay);
        assert!(matches!(result, Err(InterceptorError::MalformedEnvelope { .. })));
        assert!(harness.antiflood.blacklist().contains(&originator));
        assert!(harness.antiflood.blacklist().contains(&relay));

        // same originator through an honest relay is still refused
        let replay = P2pMessage::new(
            InterceptorHarness::TOPIC,
            batch(&[transaction(2, 0, 0)]),
            originator,
            2,
        );
        assert!(matches!(
            harness.interceptor.intercept(&replay, &honest),
            Err(InterceptorError::Antiflood(AntifloodError::Blacklisted(peer))) if peer == originator
        ));
        assert!(!harness.antiflood.blacklist().contains(&honest));
        assert_eq!(harness.throttler.in_flight(), 0);
    }

    #[test]
    fn test_empty_message_is_not_misbehaviour() {
        let harness = InterceptorHarness::new(10, AntifloodConfig::default());
        let empty = P2pMessage::new(InterceptorHarness::TOPIC, Vec::new(), peer(1), 1);

        let result = harness.interceptor.intercept(&empty, &peer(1));

        assert!(matches!(result, Err(InterceptorError::NoDataInMessage)));
        assert!(harness.antiflood.blacklist().is_empty());
        assert_eq!(harness.throttler.total_started(), 0);
    }

    #[test]
    fn test_garbage_request_bans_requester() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (attacker, victim) = (cluster.node(0), cluster.node(1));
        let header = meta_header(3);
        victim.node.pool().meta_headers().put(hash(&header), header.clone());
        let request = RequestData::from_hash(&hash(&header)).encode().unwrap();

        attacker
            .messenger
            .send_to_connected_peer(
                &request_topic(METACHAIN_BLOCKS_TOPIC),
                truncated(request),
                &victim.id(),
            )
            .unwrap();
        assert!(victim.is_blacklisted(&attacker.id()));

        attacker.node.request_meta_header(&hash(&header)).unwrap();
        assert!(!attacker.node.pool().meta_headers().has(&hash(&header)));
        assert_eq!(
            victim.messenger.stats().sent.load(std::sync::atomic::Ordering::Relaxed),
            0
        );
    }
}
