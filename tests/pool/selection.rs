//! Built-in and custom selectors driven through the pool.

use crate::test_utils::{MockConnection, nodes};
use nodepool::{Connection, ConnectionPool, SelectionStrategy};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

async fn picks(pool: &ConnectionPool<MockConnection>, calls: usize) -> Vec<String> {
    let mut names = Vec::with_capacity(calls);
    for _ in 0..calls {
        names.push(pool.next_connection().await.unwrap().name().to_string());
    }
    names
}

#[tokio::test]
async fn round_robin_visits_every_member_in_insertion_order() {
    let pool = ConnectionPool::new(nodes(5, |_| true)).unwrap();

    let first_cycle = picks(&pool, 5).await;
    let second_cycle = picks(&pool, 5).await;

    let expected: Vec<_> = (0..5).map(|i| format!("node-{i}")).collect();
    assert_eq!(first_cycle, expected);
    assert_eq!(second_cycle, expected);
}

#[tokio::test]
async fn round_robin_skips_dead_members_without_stalling() {
    let pool = ConnectionPool::new(nodes(4, |i| i != 1)).unwrap();

    let names = picks(&pool, 6).await;

    assert!(!names.contains(&"node-1".to_string()));
    assert_eq!(pool.connections()[1].pings(), 1);
}

#[tokio::test]
async fn sticky_round_robin_stays_until_the_node_dies() {
    let pool = ConnectionPool::builder()
        .connections(nodes(3, |_| true))
        .selection_strategy(SelectionStrategy::StickyRoundRobin)
        .build()
        .unwrap();

    assert_eq!(picks(&pool, 4).await, ["node-0"; 4]);

    pool.connections()[0].set_up(false);
    let moved = pool.next_connection_with(true).await.unwrap();
    assert_eq!(moved.name(), "node-1");

    assert_eq!(picks(&pool, 3).await, ["node-1"; 3]);
}

#[tokio::test]
async fn random_selection_only_returns_pool_members() {
    let pool = ConnectionPool::builder()
        .connections(nodes(4, |_| true))
        .selection_strategy(SelectionStrategy::Random)
        .build()
        .unwrap();

    let members: HashSet<_> = (0..4).map(|i| format!("node-{i}")).collect();
    for name in picks(&pool, 50).await {
        assert!(members.contains(&name));
    }
}

#[tokio::test]
async fn custom_selector_takes_precedence_over_strategy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let pool = ConnectionPool::builder()
        .connections(nodes(3, |_| true))
        .selection_strategy(SelectionStrategy::Random)
        .selector(move |connections: &[Arc<MockConnection>]| {
            seen.fetch_add(1, Ordering::SeqCst);
            connections.len().checked_sub(1)
        })
        .build()
        .unwrap();

    assert_eq!(picks(&pool, 3).await, ["node-2"; 3]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn selector_returning_nothing_exhausts_the_pool() {
    let pool = ConnectionPool::builder()
        .connections(nodes(3, |_| true))
        .selector(|_: &[Arc<MockConnection>]| None)
        .build()
        .unwrap();

    let err = pool.next_connection().await.unwrap_err();

    assert!(err.is_no_nodes_available());
    assert!(pool.connections().iter().all(|c| c.pings() == 0));
}

#[tokio::test]
async fn randomized_hosts_keep_every_member() {
    let pool = ConnectionPool::builder()
        .connections(nodes(16, |_| true))
        .randomize_hosts(true)
        .build()
        .unwrap();

    let names: HashSet<_> = pool
        .connections()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names.len(), 16);

    // One full cycle still visits each member exactly once.
    let cycle: HashSet<_> = picks(&pool, 16).await.into_iter().collect();
    assert_eq!(cycle, names);
    assert!(pool.connections().iter().all(|c| c.is_alive()));
}
