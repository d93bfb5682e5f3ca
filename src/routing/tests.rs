//! Routing Module Tests
//!
//! Validates the key distribution logic and owner placement.
//!
//! ## Test Scopes
//! - **Partitioner**: deterministic, process-independent hashing with fair
//!   distribution across partitions.
//! - **RoutingTable**: positional owner placement over the static peer list.
//!
//! *Note: `ClusterClient` delivery is exercised in integration tests with a
//! running cluster.*

#[cfg(test)]
mod tests {
    use crate::routing::partitioner::{Partitioner, DEFAULT_PARTITION_COUNT};
    use crate::routing::table::RoutingTable;
    use std::net::SocketAddr;

    // ============================================================
    // PARTITIONER TESTS
    // ============================================================

    #[test]
    fn test_partition_is_deterministic() {
        let partitioner = Partitioner::default();

        // Same key bytes -> same partition
        let p1 = partitioner.partition_for(b"order_100");
        let p2 = partitioner.partition_for(b"order_100");
        assert_eq!(p1, p2, "the same key should yield the same partition");
    }

    #[test]
    fn test_partition_is_stable_across_instances() {
        // A fresh partitioner must agree with the first one: the derivation
        // carries no per-process state, which is what makes routing from
        // different members converge on one owner.
        let p1 = Partitioner::default().partition_for(b"order_100");
        let p2 = Partitioner::default().partition_for(b"order_100");
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_partition_known_value() {
        // Pinned expectation: SHA-256("order_100") starts with b2 fa 7a d0,
        // so the big-endian prefix modulo 256 is 0xd0. Catches any
        // accidental change of digest or byte order, which would silently
        // re-route every key in a mixed-version cluster.
        assert_eq!(Partitioner::default().partition_for(b"order_100"), 0xd0);
    }

    #[test]
    fn test_partition_is_within_range() {
        let partitioner = Partitioner::default();

        for i in 0..1000 {
            let key = format!("test_key_{}", i);
            let partition = partitioner.partition_for(key.as_bytes());
            assert!(
                partition < DEFAULT_PARTITION_COUNT,
                "Partition {} should be < {}",
                partition,
                DEFAULT_PARTITION_COUNT
            );
        }
    }

    #[test]
    fn test_partition_distribution() {
        let partitioner = Partitioner::default();

        // Check partition distribution (ensure not all keys go to one bucket)
        let mut partition_counts = std::collections::HashMap::new();

        for i in 0..10000 {
            let key = format!("order_{}", i);
            let partition = partitioner.partition_for(key.as_bytes());
            *partition_counts.entry(partition).or_insert(0) += 1;
        }

        // With 256 partitions and 10000 keys, each should have ~39 keys.
        // We check if we have at least 100 used partitions (reasonable distribution).
        assert!(
            partition_counts.len() > 100,
            "Should have more than 100 distinct partitions used, got: {}",
            partition_counts.len()
        );
    }

    // ============================================================
    // ROUTING TABLE TESTS
    // ============================================================

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[test]
    fn test_single_node_owns_everything() {
        let table = RoutingTable::new(addr(6000), vec![]);

        for partition in 0..DEFAULT_PARTITION_COUNT {
            assert_eq!(table.owner(partition).unwrap(), addr(6000));
            assert!(table.is_local(partition).unwrap());
        }
    }

    #[test]
    fn test_owner_is_independent_of_peer_order() {
        let table_a = RoutingTable::new(addr(6000), vec![addr(6001), addr(6002)]);
        let table_b = RoutingTable::new(addr(6001), vec![addr(6002), addr(6000)]);

        for partition in 0..DEFAULT_PARTITION_COUNT {
            assert_eq!(
                table_a.owner(partition).unwrap(),
                table_b.owner(partition).unwrap(),
                "both members must resolve the same owner for partition {}",
                partition
            );
        }
    }

    #[test]
    fn test_local_addr_is_added_once() {
        let table = RoutingTable::new(addr(6000), vec![addr(6000), addr(6001)]);
        assert_eq!(table.peer_count(), 2);
    }

    #[test]
    fn test_partitions_spread_across_peers() {
        let table = RoutingTable::new(addr(6000), vec![addr(6001), addr(6002)]);

        let mut owned_here = 0;
        for partition in 0..DEFAULT_PARTITION_COUNT {
            if table.is_local(partition).unwrap() {
                owned_here += 1;
            }
        }

        // 256 partitions across 3 peers: the local node owns a third.
        assert!(
            owned_here > 0 && owned_here < DEFAULT_PARTITION_COUNT,
            "local node should own some but not all partitions, owns {}",
            owned_here
        );
    }
}
