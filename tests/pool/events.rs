//! Event listeners and callbacks.

use crate::test_utils::nodes;
use nodepool::{ConnectionPool, ConnectionPoolEvent, FnListener, ManualClock, PoolEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn recorder() -> (
    Arc<Mutex<Vec<&'static str>>>,
    FnListener<ConnectionPoolEvent, impl Fn(&ConnectionPoolEvent) + Send + Sync + 'static>,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = FnListener::new(move |event: &ConnectionPoolEvent| {
        sink.lock().unwrap().push(event.event_type());
    });
    (seen, listener)
}

#[tokio::test]
async fn failover_emits_events_in_order() {
    let (seen, listener) = recorder();
    let clock = ManualClock::new();

    let pool = ConnectionPool::builder()
        .name("events")
        .connections(nodes(2, |i| i == 1))
        .clock(clock.clone())
        .on_event(listener)
        .build()
        .unwrap();

    pool.next_connection().await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        ["marked_dead", "revived", "selected"]
    );

    seen.lock().unwrap().clear();
    // node-0 is backing off and gets passed over on every call.
    pool.next_connection().await.unwrap();
    pool.next_connection().await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        ["skipped", "selected", "skipped", "selected"]
    );
}

#[tokio::test]
async fn exhaustion_event_carries_pool_name_and_attempts() {
    let captured = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&captured);

    let pool = ConnectionPool::builder()
        .name("doomed")
        .connections(nodes(3, |_| false))
        .on_event(FnListener::new(move |event: &ConnectionPoolEvent| {
            if let ConnectionPoolEvent::Exhausted { attempts, .. } = event {
                *sink.lock().unwrap() = Some((event.pool_name().to_string(), *attempts));
            }
        }))
        .build()
        .unwrap();

    assert!(pool.next_connection().await.is_err());
    assert_eq!(*captured.lock().unwrap(), Some(("doomed".to_string(), 3)));
}

#[tokio::test]
async fn marked_dead_reports_growing_retry_after() {
    let retry_after = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&retry_after);
    let clock = ManualClock::new();

    let pool = ConnectionPool::builder()
        .connections(nodes(1, |_| false))
        .clock(clock.clone())
        .on_event(FnListener::new(move |event: &ConnectionPoolEvent| {
            if let ConnectionPoolEvent::MarkedDead { retry_after, .. } = event {
                sink.lock().unwrap().push(*retry_after);
            }
        }))
        .build()
        .unwrap();

    for _ in 0..3 {
        assert!(pool.next_connection().await.is_err());
        clock.advance(Duration::from_secs(3600));
    }

    assert_eq!(
        *retry_after.lock().unwrap(),
        [
            Duration::from_secs(120),
            Duration::from_secs(240),
            Duration::from_secs(480)
        ]
    );
}

#[tokio::test]
async fn convenience_callbacks() {
    let dead = Arc::new(AtomicUsize::new(0));
    let revived = Arc::new(AtomicUsize::new(0));
    let exhausted = Arc::new(AtomicUsize::new(0));
    let (d, r, e) = (
        Arc::clone(&dead),
        Arc::clone(&revived),
        Arc::clone(&exhausted),
    );

    let pool = ConnectionPool::builder()
        .connections(nodes(3, |i| i == 2))
        .on_marked_dead(move |_, _| {
            d.fetch_add(1, Ordering::SeqCst);
        })
        .on_revived(move |host| {
            assert_eq!(host.host(), "node-2");
            r.fetch_add(1, Ordering::SeqCst);
        })
        .on_exhausted(move |_| {
            e.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    pool.next_connection().await.unwrap();

    assert_eq!(dead.load(Ordering::SeqCst), 2);
    assert_eq!(revived.load(Ordering::SeqCst), 1);
    assert_eq!(exhausted.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn panicking_listener_does_not_break_selection() {
    let listener = FnListener::new(|_: &ConnectionPoolEvent| panic!("observer bug"));
    let pool = ConnectionPool::builder()
        .connections(nodes(2, |_| true))
        .on_event(listener)
        .build()
        .unwrap();

    let connection = pool.next_connection().await.unwrap();
    assert_eq!(connection.name(), "node-0");
}
