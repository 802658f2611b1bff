//! # Admission Flows
//!
//! Gossip leaving one node and landing in another node's data pool.
//!
//! ```text
//! [Node A] ──broadcast──→ [InMemoryNetwork] ──→ [Node B interceptor]
//!                                                   │
//!                         antiflood → throttler → decode → validity
//!                                                   │
//!                                    relevant or whitelisted?
//!                                      yes ↓            no ↓
//!                                   [B data pool]     dropped
//! ```
//!
//! ## Test Categories
//!
//! 1. **Happy Path**: batches and single headers committed on the receiver
//! 2. **Isolation**: one invalid element does not void its siblings
//! 3. **Relevance**: foreign-shard data dropped unless whitelisted
//! 4. **Concurrency**: throttler slots balanced under parallel load

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use shared_types::topics::{METACHAIN_BLOCKS_TOPIC, SHARD_BLOCKS_TOPIC};
    use shared_types::{Messenger, P2pMessage, METACHAIN_SHARD_ID};
    use sn_01_interceptors::{AntifloodConfig, DebugEvent, InterceptorError, RecordingDebugger};

    use crate::fixtures::*;

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[test]
    fn test_transaction_batch_reaches_peer_pool() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (sender, receiver) = (cluster.node(0), cluster.node(1));
        let txs = vec![transaction(1, 0, 0), transaction(2, 0, 0)];

        sender
            .messenger
            .broadcast("transactions_0", batch(&txs))
            .unwrap();

        for tx in &txs {
            assert!(receiver.node.pool().transactions().has(&hash(tx)));
        }
        // no loopback to the broadcaster
        assert!(sender.node.pool().transactions().is_empty());
        assert_eq!(receiver.messenger.stats().delivered.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_meta_header_is_pooled_and_indexed_by_nonce() {
        let cluster = Cluster::new(1, &[0, 0]);
        let header = meta_header(4);

        cluster
            .node(0)
            .messenger
            .broadcast(METACHAIN_BLOCKS_TOPIC, batch(&[header.clone()]))
            .unwrap();

        let pool = cluster.node(1).node.pool();
        assert_eq!(pool.meta_headers().get(&hash(&header)), Some(header.clone()));
        assert_eq!(
            pool.meta_header_nonces().get(4, METACHAIN_SHARD_ID),
            Some(hash(&header))
        );
    }

    #[test]
    fn test_metachain_keeps_every_shard_header() {
        let cluster = Cluster::new(2, &[0, METACHAIN_SHARD_ID]);
        let header = shard_header(3, 0);

        cluster
            .node(0)
            .messenger
            .broadcast(&format!("{SHARD_BLOCKS_TOPIC}_0_META"), batch(&[header.clone()]))
            .unwrap();

        let pool = cluster.node(1).node.pool();
        assert!(pool.shard_headers().has(&hash(&header)));
        assert_eq!(pool.shard_header_nonces().get(3, 0), Some(hash(&header)));
    }

    // =========================================================================
    // ISOLATION
    // =========================================================================

    #[test]
    fn test_invalid_element_does_not_void_siblings() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (sender, receiver) = (cluster.node(0), cluster.node(1));
        let debugger = Arc::new(RecordingDebugger::new(32));
        receiver.node.set_intercepted_debug_handler(debugger.clone());
        let elements = vec![
            encoded(&transaction(1, 0, 0)),
            encoded(&unsigned_transaction(2)),
            encoded(&transaction(3, 0, 0)),
        ];

        sender
            .messenger
            .broadcast("transactions_0", encoded(&shared_types::Batch::new(elements)))
            .unwrap();

        let pool = receiver.node.pool();
        assert_eq!(pool.transactions().len(), 2);
        assert!(!pool.transactions().has(&hash(&unsigned_transaction(2))));
        // invalid data is not misbehaviour
        assert!(!receiver.is_blacklisted(&sender.id()));
        assert_eq!(receiver.messenger.stats().rejected.load(Ordering::Relaxed), 1);

        let failed: Vec<DebugEvent> = debugger
            .events()
            .into_iter()
            .filter(|event| matches!(event, DebugEvent::Processed { error: Some(_), .. }))
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(debugger.events().len(), 6);
    }

    // =========================================================================
    // RELEVANCE
    // =========================================================================

    #[test]
    fn test_foreign_shard_transaction_needs_whitelist() {
        // node 0 lives in shard 1, node 1 in shard 0; both share transactions_0_1
        let cluster = Cluster::new(2, &[1, 0]);
        let (sender, receiver) = (cluster.node(0), cluster.node(1));
        let foreign = transaction(5, 1, 1);
        let inbound = transaction(6, 1, 0);

        sender
            .messenger
            .broadcast("transactions_0_1", batch(&[foreign.clone(), inbound.clone()]))
            .unwrap();

        let pool = receiver.node.pool();
        assert!(!pool.transactions().has(&hash(&foreign)));
        assert!(pool.transactions().has(&hash(&inbound)));
        assert!(!receiver.is_blacklisted(&sender.id()));

        receiver.node.whitelist().add(&[hash(&foreign)]);
        sender
            .messenger
            .broadcast("transactions_0_1", batch(&[foreign.clone()]))
            .unwrap();
        assert!(pool.transactions().has(&hash(&foreign)));
    }

    #[test]
    fn test_whitelist_entry_expires() {
        let cluster = Cluster::new(2, &[1, 0]);
        let (sender, receiver) = (cluster.node(0), cluster.node(1));
        let foreign = transaction(8, 1, 1);
        receiver.node.whitelist().add(&[hash(&foreign)]);

        let ttl = node_config(2, 0).whitelist.ttl;
        cluster.clock.advance(ttl.as_millis() as u64 + 1);
        sender
            .messenger
            .broadcast("transactions_0_1", batch(&[foreign.clone()]))
            .unwrap();

        assert!(!receiver.node.pool().transactions().has(&hash(&foreign)));
    }

    #[test]
    fn test_foreign_mini_block_dropped_silently() {
        let cluster = Cluster::new(2, &[1, 0]);
        let block = mini_block(1, 1, 0x30);

        cluster
            .node(0)
            .messenger
            .broadcast("txBlockBodies_0_1", batch(&[block.clone()]))
            .unwrap();

        let receiver = cluster.node(1);
        assert!(receiver.node.pool().mini_blocks().is_empty());
        // a silent drop still counts as an accepted message
        assert_eq!(receiver.messenger.stats().rejected.load(Ordering::Relaxed), 0);
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_mixed_traffic_keeps_throttler_balanced() {
        let harness = Arc::new(InterceptorHarness::new(1_000, AntifloodConfig::default()));
        let mut tasks = Vec::new();
        for i in 0..96u64 {
            let harness = Arc::clone(&harness);
            tasks.push(tokio::spawn(async move {
                // distinct peers so blacklisting stays local to the offender
                let from = peer(10 + i as u8);
                let data = match i % 3 {
                    0 => batch(&[transaction(i, 0, 0)]),
                    1 => batch(&[unsigned_transaction(i)]),
                    _ => truncated(batch(&[transaction(i, 0, 0)])),
                };
                let message = P2pMessage::new(InterceptorHarness::TOPIC, data, from, i);
                harness.interceptor.intercept(&message, &from)
            }));
        }

        let mut malformed = 0;
        for task in tasks {
            if let Err(InterceptorError::MalformedEnvelope { .. }) = task.await.unwrap() {
                malformed += 1;
            }
        }

        assert_eq!(malformed, 32);
        assert_eq!(harness.throttler.total_started(), 96);
        assert_eq!(harness.throttler.total_ended(), 96);
        assert_eq!(harness.throttler.in_flight(), 0);
        assert_eq!(harness.pool.transactions().len(), 32);
        assert_eq!(harness.antiflood.blacklist().len(), 32);
    }

    #[test]
    fn test_full_throttler_drops_without_touching_pool() {
        let harness = InterceptorHarness::new(1, AntifloodConfig::default());
        let busy = sn_01_interceptors::ThrottleGuard::start(harness.throttler.as_ref());
        let message = P2pMessage::new(
            InterceptorHarness::TOPIC,
            batch(&[transaction(1, 0, 0)]),
            peer(1),
            1,
        );

        let result = harness.interceptor.intercept(&message, &peer(1));

        assert!(matches!(result, Err(InterceptorError::SystemBusy)));
        assert!(harness.pool.transactions().is_empty());
        assert_eq!(harness.throttler.total_started(), 1);
        drop(busy);
        assert_eq!(harness.throttler.in_flight(), 0);
    }
}
