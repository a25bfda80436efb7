//! Connection pool metrics regression tests

use super::helpers::*;
use crate::test_utils::{MockConnection, nodes};
use nodepool::ConnectionPool;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn selection_metrics_exist() {
    init_recorder();

    let pool = ConnectionPool::builder()
        .name("test_selection")
        .connections(nodes(2, |_| true))
        .build()
        .unwrap();

    // The first two calls probe fresh nodes; the third hits the fast path.
    for _ in 0..3 {
        pool.next_connection().await.unwrap();
    }

    let snapshot = get_metrics_snapshot();

    assert_counter_exists(&snapshot, "nodepool_selections_total");
    assert_metric_has_label(&snapshot, "nodepool_selections_total", "pool", "test_selection");
    assert_metric_has_label(&snapshot, "nodepool_selections_total", "path", "probed");
    assert_metric_has_label(&snapshot, "nodepool_selections_total", "path", "fast");
}

#[tokio::test]
#[serial]
async fn probe_metrics_exist() {
    init_recorder();

    let pool = ConnectionPool::builder()
        .name("test_probes")
        .connections(nodes(2, |i| i == 1))
        .build()
        .unwrap();

    pool.next_connection().await.unwrap();

    let snapshot = get_metrics_snapshot();

    assert_counter_exists(&snapshot, "nodepool_probes_total");
    assert_metric_has_label(&snapshot, "nodepool_probes_total", "pool", "test_probes");
    assert_metric_has_label(&snapshot, "nodepool_probes_total", "result", "alive");
    assert_metric_has_label(&snapshot, "nodepool_probes_total", "result", "dead");
}

#[tokio::test]
#[serial]
async fn connection_alive_gauge_tracks_probe_results() {
    init_recorder();

    let pool = ConnectionPool::builder()
        .name("test_gauge")
        .connection(MockConnection::down("gauge-down"))
        .connection(MockConnection::up("gauge-up"))
        .build()
        .unwrap();

    pool.next_connection().await.unwrap();

    let snapshot = get_metrics_snapshot();

    assert_gauge_exists(&snapshot, "nodepool_connection_alive");
    assert_metric_has_label(&snapshot, "nodepool_connection_alive", "pool", "test_gauge");
    assert_eq!(
        gauge_value(&snapshot, "nodepool_connection_alive", "host", "http://gauge-down:9200"),
        Some(0.0)
    );
    assert_eq!(
        gauge_value(&snapshot, "nodepool_connection_alive", "host", "http://gauge-up:9200"),
        Some(1.0)
    );
}

#[tokio::test]
#[serial]
async fn exhausted_metric_exists() {
    init_recorder();

    let pool = ConnectionPool::builder()
        .name("test_exhausted")
        .connections(nodes(3, |_| false))
        .build()
        .unwrap();

    assert!(pool.next_connection().await.is_err());

    let snapshot = get_metrics_snapshot();

    assert_counter_exists(&snapshot, "nodepool_exhausted_total");
    assert_metric_has_label(&snapshot, "nodepool_exhausted_total", "pool", "test_exhausted");
}
