//! # Flooding Attacks
//!
//! ## Attack Vectors
//!
//! | Vector                  | Defence                                   |
//! |-------------------------|-------------------------------------------|
//! | Message storm           | per-peer quota on whole messages          |
//! | Oversized batches       | per-(peer, topic) quota on elements       |
//! | Relayed storm           | originator charged next to the relay      |
//! | Request storm           | resolvers share the node's antiflood      |
//! | Forged originator ids   | elapsed quota windows pruned on insert    |
//!
//! Quota violations reject the message but never blacklist: a busy honest
//! peer is throttled, not banned.

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use shared_types::{Messenger, P2pMessage};
    use sn_01_interceptors::{AntifloodConfig, AntifloodError, InterceptorError, QuotaConfig};

    use crate::fixtures::*;

    const WINDOW: Duration = Duration::from_secs(1);

    fn peer_quota(max_messages: u32) -> AntifloodConfig {
        AntifloodConfig {
            peer: QuotaConfig::new(max_messages, 1 << 20, WINDOW),
            ..AntifloodConfig::default()
        }
    }

    #[test]
    fn test_message_storm_capped_per_window() {
        let cluster = Cluster::with_config(1, &[0, 0], |config| config.antiflood = peer_quota(3));
        let (attacker, victim) = (cluster.node(0), cluster.node(1));

        for nonce in 0..5 {
            attacker
                .messenger
                .broadcast("transactions_0", batch(&[transaction(nonce, 0, 0)]))
                .unwrap();
        }

        assert_eq!(victim.node.pool().transactions().len(), 3);
        assert_eq!(victim.messenger.stats().rejected.load(Ordering::Relaxed), 2);
        assert!(!victim.is_blacklisted(&attacker.id()));

        cluster.clock.advance(WINDOW.as_millis() as u64);
        attacker
            .messenger
            .broadcast("transactions_0", batch(&[transaction(99, 0, 0)]))
            .unwrap();
        assert_eq!(victim.node.pool().transactions().len(), 4);
    }

    #[test]
    fn test_oversized_batch_voids_whole_message() {
        let cluster = Cluster::with_config(1, &[0, 0], |config| {
            config.antiflood.topic = QuotaConfig::new(5, 1 << 20, WINDOW);
        });
        let (attacker, victim) = (cluster.node(0), cluster.node(1));
        let txs: Vec<_> = (0..6).map(|nonce| transaction(nonce, 0, 0)).collect();

        attacker.messenger.broadcast("transactions_0", batch(&txs)).unwrap();
        assert!(victim.node.pool().transactions().is_empty());

        // the topic window stays exhausted, other topics do not
        attacker
            .messenger
            .broadcast("transactions_0", batch(&txs[..1]))
            .unwrap();
        assert!(victim.node.pool().transactions().is_empty());
        attacker
            .messenger
            .broadcast("txBlockBodies_0", batch(&[mini_block(0, 0, 0x10)]))
            .unwrap();
        assert_eq!(victim.node.pool().mini_blocks().len(), 1);

        cluster.clock.advance(WINDOW.as_millis() as u64);
        attacker
            .messenger
            .broadcast("transactions_0", batch(&txs[..5]))
            .unwrap();
        assert_eq!(victim.node.pool().transactions().len(), 5);
    }

    #[test]
    fn test_relayed_storm_charges_originator() {
        let harness = InterceptorHarness::new(100, peer_quota(3));
        let originator = peer(0xA0);

        // each relay forwards only once or twice, the originator is over
        let mut results = Vec::new();
        for (seq_no, relay) in [peer(1), peer(2), peer(1), peer(3)].into_iter().enumerate() {
            let message = P2pMessage::new(
                InterceptorHarness::TOPIC,
                batch(&[transaction(seq_no as u64, 0, 0)]),
                originator,
                seq_no as u64,
            );
            results.push(harness.interceptor.intercept(&message, &relay));
        }

        assert!(results[..3].iter().all(Result::is_ok));
        assert!(matches!(
            &results[3],
            Err(InterceptorError::Antiflood(AntifloodError::PeerQuotaExceeded { peer, .. }))
                if *peer == originator
        ));
        assert_eq!(harness.pool.transactions().len(), 3);

        // the relay still has quota for its own traffic
        let own = P2pMessage::new(
            InterceptorHarness::TOPIC,
            batch(&[transaction(50, 0, 0)]),
            peer(3),
            50,
        );
        assert!(harness.interceptor.intercept(&own, &peer(3)).is_ok());
    }

    #[test]
    fn test_request_storm_is_throttled_like_gossip() {
        let cluster = Cluster::with_config(1, &[0, 0], |config| config.antiflood = peer_quota(2));
        let (attacker, victim) = (cluster.node(0), cluster.node(1));
        let header = meta_header(1);
        victim.node.pool().meta_headers().put(hash(&header), header.clone());

        for _ in 0..4 {
            attacker.node.request_meta_header(&hash(&header)).unwrap();
        }

        // two answered, two rejected at the victim's ingress
        assert_eq!(victim.messenger.stats().sent.load(Ordering::Relaxed), 2);
        assert_eq!(victim.messenger.stats().rejected.load(Ordering::Relaxed), 2);
        assert!(!victim.is_blacklisted(&attacker.id()));
    }

    #[test]
    fn test_forged_originators_are_forgotten() {
        let harness = InterceptorHarness::new(100, AntifloodConfig::default());
        for n in 0..1_000u64 {
            let mut originator = [0u8; 32];
            originator[..8].copy_from_slice(&n.to_be_bytes());
            let mut relay = originator;
            relay[31] = 0xFF;
            let message = P2pMessage::new(
                InterceptorHarness::TOPIC,
                batch(&[transaction(n, 0, 0)]),
                shared_types::PeerId::new(originator),
                n,
            );
            harness
                .interceptor
                .intercept(&message, &shared_types::PeerId::new(relay))
                .unwrap();
        }
        // relay and originator windows, plus one topic window per relay
        assert_eq!(harness.antiflood.tracked_windows(), 3_000);

        harness.clock.advance(WINDOW.as_millis() as u64);
        let honest = P2pMessage::new(
            InterceptorHarness::TOPIC,
            batch(&[transaction(5_000, 0, 0)]),
            peer(1),
            1,
        );
        harness.interceptor.intercept(&honest, &peer(1)).unwrap();
        assert_eq!(harness.antiflood.tracked_windows(), 2);
    }

    #[test]
    fn test_sweep_clears_elapsed_windows() {
        let cluster = Cluster::with_config(1, &[0, 0], |config| config.antiflood = peer_quota(10));
        let (attacker, victim) = (cluster.node(0), cluster.node(1));
        attacker
            .messenger
            .broadcast("transactions_0", batch(&[transaction(1, 0, 0)]))
            .unwrap();

        assert_eq!(victim.node.sweep(), 0);
        cluster.clock.advance(WINDOW.as_millis() as u64);
        // one peer window, one (peer, topic) window
        assert_eq!(victim.node.sweep(), 2);
    }
}
