//! Shared test utilities: a scriptable in-memory connection.

#![allow(dead_code)]

use nodepool::{Connection, HealthRecord, Host};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// A connection whose probe answer is set by the test.
///
/// Counts probes, deaths and revivals so tests can assert exactly which
/// transitions the pool drove.
#[derive(Debug)]
pub struct MockConnection {
    host: Host,
    health: HealthRecord,
    up: AtomicBool,
    ping_delay: Option<Duration>,
    pings: AtomicUsize,
    deaths: AtomicUsize,
    revivals: AtomicUsize,
}

impl MockConnection {
    /// A never-probed connection that answers probes.
    pub fn up(name: &str) -> Self {
        Self::with_answer(name, true)
    }

    /// A never-probed connection that fails probes.
    pub fn down(name: &str) -> Self {
        Self::with_answer(name, false)
    }

    /// A connection already flagged alive.
    pub fn alive(name: &str) -> Self {
        let connection = Self::up(name);
        connection.health.mark_alive(Instant::now());
        connection
    }

    fn with_answer(name: &str, up: bool) -> Self {
        Self {
            host: name.parse().expect("valid host descriptor"),
            health: HealthRecord::new(),
            up: AtomicBool::new(up),
            ping_delay: None,
            pings: AtomicUsize::new(0),
            deaths: AtomicUsize::new(0),
            revivals: AtomicUsize::new(0),
        }
    }

    /// Makes every probe sleep before answering.
    pub fn with_ping_delay(mut self, delay: Duration) -> Self {
        self.ping_delay = Some(delay);
        self
    }

    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn deaths(&self) -> usize {
        self.deaths.load(Ordering::SeqCst)
    }

    pub fn revivals(&self) -> usize {
        self.revivals.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        self.host.host()
    }
}

impl Connection for MockConnection {
    fn host(&self) -> &Host {
        &self.host
    }

    async fn ping(&self) -> bool {
        if let Some(delay) = self.ping_delay {
            tokio::time::sleep(delay).await;
        }
        self.pings.fetch_add(1, Ordering::SeqCst);
        self.up.load(Ordering::SeqCst)
    }

    fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    fn mark_alive(&self, at: Instant) {
        self.revivals.fetch_add(1, Ordering::SeqCst);
        self.health.mark_alive(at)
    }

    fn mark_dead(&self, at: Instant) {
        self.deaths.fetch_add(1, Ordering::SeqCst);
        self.health.mark_dead(at);
    }

    fn ping_failures(&self) -> u32 {
        self.health.ping_failures()
    }

    fn last_ping(&self) -> Option<Instant> {
        self.health.last_ping()
    }
}

/// `count` connections named `node-0`, `node-1`, ..., answering probes when
/// `up(index)` is true.
pub fn nodes(count: usize, up: impl Fn(usize) -> bool) -> Vec<MockConnection> {
    (0..count)
        .map(|i| {
            let name = format!("node-{i}");
            if up(i) {
                MockConnection::up(&name)
            } else {
                MockConnection::down(&name)
            }
        })
        .collect()
}

/// `count` connections named `node-0`, `node-1`, ..., already flagged alive.
pub fn alive_nodes(count: usize) -> Vec<MockConnection> {
    (0..count)
        .map(|i| MockConnection::alive(&format!("node-{i}")))
        .collect()
}

/// Installs a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}
