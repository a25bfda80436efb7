//! Property tests for `next_connection`.
//!
//! Invariants tested:
//! - A returned connection is always alive
//! - No connection is probed more than once per call
//! - Exhaustion only happens when every connection is down
//! - Exhaustion reports one attempt per connection

use crate::test_utils::nodes;
use nodepool::{Connection, ConnectionPool, PoolError, SelectionStrategy};
use proptest::prelude::*;
use tokio::runtime::Runtime;

fn strategy() -> impl Strategy<Value = SelectionStrategy> {
    prop_oneof![
        Just(SelectionStrategy::RoundRobin),
        Just(SelectionStrategy::StickyRoundRobin),
        Just(SelectionStrategy::Random),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: round-robin finds a live node whenever one exists
    #[test]
    fn round_robin_finds_any_live_node(
        up in prop::collection::vec(any::<bool>(), 1..=24),
        force in any::<bool>(),
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let count = up.len();
            let pool = ConnectionPool::new(nodes(count, |i| up[i])).unwrap();

            let result = pool.next_connection_with(force).await;

            match result {
                Ok(connection) => {
                    prop_assert!(connection.is_alive());
                    prop_assert_eq!(connection.ping_failures(), 0);
                }
                Err(PoolError::NoNodesAvailable { attempts, .. }) => {
                    prop_assert!(up.iter().all(|&u| !u), "exhausted with a live node present");
                    prop_assert_eq!(attempts, count);
                }
            }

            for connection in pool.connections() {
                prop_assert!(connection.pings() <= 1, "{} probed twice", connection.name());
            }

            Ok(())
        })?;
    }

    /// Property: every strategy returns only alive connections and never double-probes
    #[test]
    fn any_strategy_returns_only_alive_connections(
        up in prop::collection::vec(any::<bool>(), 1..=16),
        strategy in strategy(),
        calls in 1usize..=8,
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let pool = ConnectionPool::builder()
                .connections(nodes(up.len(), |i| up[i]))
                .selection_strategy(strategy)
                .build()
                .unwrap();

            for _ in 0..calls {
                let before: Vec<_> = pool.connections().iter().map(|c| c.pings()).collect();

                if let Ok(connection) = pool.next_connection().await {
                    prop_assert!(connection.is_alive());
                }

                for (connection, before) in pool.connections().iter().zip(before) {
                    prop_assert!(connection.pings() - before <= 1);
                }
            }

            Ok(())
        })?;
    }

    /// Property: with every node down, each is probed once and all end up dead
    #[test]
    fn all_down_probes_each_node_exactly_once(count in 1usize..=32) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let pool = ConnectionPool::new(nodes(count, |_| false)).unwrap();

            let err = pool.next_connection().await.unwrap_err();
            prop_assert!(err.is_no_nodes_available());

            for connection in pool.connections() {
                prop_assert_eq!(connection.pings(), 1);
                prop_assert_eq!(connection.ping_failures(), 1);
                prop_assert!(!connection.is_alive());
            }

            Ok(())
        })?;
    }
}
