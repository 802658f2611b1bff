//! # Recovery Flows
//!
//! A node missing data asks its peers through a resolver; the answer comes
//! back on the base topic and is committed by the requester's own
//! interceptor.
//!
//! ```text
//! [Requester] ──<topic>_REQUEST──→ [Responder resolver]
//!      ↑                                  │ pool, then storage
//!      └──────────── <topic> ─────────────┘
//! [Requester interceptor] ──→ [Requester data pool]
//! ```
//!
//! Every request whitelists its hashes first, so cross-shard answers pass
//! the relevance filter on the way back.

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use shared_types::METACHAIN_SHARD_ID;
    use sn_02_resolvers::{nonce_key, UnitType};

    use crate::fixtures::*;

    // =========================================================================
    // META HEADERS
    // =========================================================================

    #[test]
    fn test_meta_header_by_hash_from_peer_pool() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (requester, responder) = (cluster.node(0), cluster.node(1));
        let header = meta_header(7);
        let header_hash = hash(&header);
        responder.node.pool().meta_headers().put(header_hash, header.clone());

        requester.node.request_meta_header(&header_hash).unwrap();

        assert_eq!(requester.node.pool().meta_headers().get(&header_hash), Some(header));
        assert!(requester.node.whitelist().contains(&header_hash));
    }

    #[test]
    fn test_meta_header_by_nonce_through_peer_index() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (requester, responder) = (cluster.node(0), cluster.node(1));
        let header = meta_header(9);
        let pool = responder.node.pool();
        pool.meta_headers().put(hash(&header), header.clone());
        pool.meta_header_nonces()
            .merge(9, [(METACHAIN_SHARD_ID, hash(&header))]);

        requester.node.request_meta_header_by_nonce(9).unwrap();

        let pool = requester.node.pool();
        assert!(pool.meta_headers().has(&hash(&header)));
        assert_eq!(
            pool.meta_header_nonces().get(9, METACHAIN_SHARD_ID),
            Some(hash(&header))
        );
    }

    #[test]
    fn test_meta_header_by_nonce_from_peer_storage() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (requester, responder) = (cluster.node(0), cluster.node(1));
        let header = meta_header(11);
        let storage = responder.node.storage();
        storage
            .put(UnitType::MetaHeaders, &hash(&header), encoded(&header))
            .unwrap();
        storage
            .put(
                UnitType::MetaHeaderNonces,
                &nonce_key(11, METACHAIN_SHARD_ID),
                hash(&header).to_vec(),
            )
            .unwrap();

        requester.node.request_meta_header_by_nonce(11).unwrap();

        assert!(requester.node.pool().meta_headers().has(&hash(&header)));
    }

    #[test]
    fn test_unknown_header_gets_no_answer() {
        let cluster = Cluster::new(1, &[0, 0]);
        let (requester, responder) = (cluster.node(0), cluster.node(1));

        requester.node.request_meta_header(&[0xEE; 32]).unwrap();
        requester.node.request_meta_header_by_nonce(404).unwrap();

        assert!(requester.node.pool().meta_headers().is_empty());
        // two requests in, nothing out
        assert_eq!(responder.messenger.stats().delivered.load(Ordering::Relaxed), 2);
        assert_eq!(responder.messenger.stats().sent.load(Ordering::Relaxed), 0);
        assert!(!responder.is_blacklisted(&requester.id()));
    }

    // =========================================================================
    // SHARD HEADERS
    // =========================================================================

    #[test]
    fn test_shard_header_by_nonce_from_metachain() {
        let cluster = Cluster::new(2, &[0, METACHAIN_SHARD_ID]);
        let (requester, metachain) = (cluster.node(0), cluster.node(1));
        let header = shard_header(3, 0);
        let header_hash = hash(&header);
        let pool = metachain.node.pool();
        pool.shard_headers().put(header_hash, header.clone());
        pool.shard_header_nonces().merge(3, [(0, header_hash)]);

        requester.node.request_shard_header_by_nonce(0, 3).unwrap();

        let pool = requester.node.pool();
        assert_eq!(pool.shard_headers().get(&header_hash), Some(header));
        assert_eq!(pool.shard_header_nonces().get(3, 0), Some(header_hash));
    }

    #[test]
    fn test_metachain_fetches_shard_header_by_hash() {
        let cluster = Cluster::new(2, &[METACHAIN_SHARD_ID, 1]);
        let (metachain, shard) = (cluster.node(0), cluster.node(1));
        let header = shard_header(5, 1);
        shard.node.pool().shard_headers().put(hash(&header), header.clone());

        metachain.node.request_shard_header(1, &hash(&header)).unwrap();

        assert!(metachain.node.pool().shard_headers().has(&hash(&header)));
    }

    // =========================================================================
    // CROSS-SHARD BODIES
    // =========================================================================

    #[test]
    fn test_cross_shard_transactions_pass_relevance_via_whitelist() {
        let cluster = Cluster::new(2, &[0, 1]);
        let (requester, responder) = (cluster.node(0), cluster.node(1));
        let txs = [transaction(1, 1, 1), transaction(2, 1, 1)];
        for tx in &txs {
            responder.node.pool().transactions().put(hash(tx), tx.clone());
        }
        let missing = [0x77; 32];

        requester
            .node
            .request_transactions(1, &[hash(&txs[0]), hash(&txs[1]), missing])
            .unwrap();

        let pool = requester.node.pool();
        assert_eq!(pool.transactions().len(), 2);
        for tx in &txs {
            assert!(pool.transactions().has(&hash(tx)));
        }
        // one request, one batched answer
        assert_eq!(responder.messenger.stats().sent.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_cross_shard_mini_block_from_storage() {
        let cluster = Cluster::new(2, &[0, 1]);
        let (requester, responder) = (cluster.node(0), cluster.node(1));
        let block = mini_block(1, 1, 0x40);
        responder
            .node
            .storage()
            .put(UnitType::MiniBlocks, &hash(&block), encoded(&block))
            .unwrap();

        requester.node.request_mini_blocks(1, &[hash(&block)]).unwrap();

        assert_eq!(
            requester.node.pool().mini_blocks().get(&hash(&block)),
            Some(block)
        );
    }

    #[test]
    fn test_unrequested_cross_shard_answer_is_dropped() {
        let cluster = Cluster::new(2, &[0, 1]);
        let (requester, responder) = (cluster.node(0), cluster.node(1));
        let tx = transaction(3, 1, 1);

        // pushed without a prior request, so never whitelisted
        shared_types::Messenger::send_to_connected_peer(
            responder.messenger.as_ref(),
            "transactions_0_1",
            batch(&[tx.clone()]),
            &requester.id(),
        )
        .unwrap();

        assert!(!requester.node.pool().transactions().has(&hash(&tx)));
    }

    #[test]
    fn test_request_reaches_only_connected_peers() {
        let cluster = Cluster::new(1, &[0, 0, 0]);
        let (requester, near, far) = (cluster.node(0), cluster.node(1), cluster.node(2));
        cluster.network.disconnect(&requester.id(), &far.id());
        let header = meta_header(2);
        far.node.pool().meta_headers().put(hash(&header), header.clone());

        requester.node.request_meta_header(&hash(&header)).unwrap();
        assert!(!requester.node.pool().meta_headers().has(&hash(&header)));

        near.node.pool().meta_headers().put(hash(&header), header.clone());
        requester.node.request_meta_header(&hash(&header)).unwrap();
        assert!(requester.node.pool().meta_headers().has(&hash(&header)));
    }
}
