//! Per-connection liveness bookkeeping.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Liveness of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Never probed. Eligible for an immediate probe.
    Unknown,
    /// The last probe succeeded.
    Alive,
    /// The last probe failed. Waiting out the revival timeout.
    Dead,
}

impl HealthState {
    /// Returns `true` only for [`HealthState::Alive`].
    pub fn is_alive(&self) -> bool {
        matches!(self, HealthState::Alive)
    }
}

/// A consistent view of a [`HealthRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSnapshot {
    /// Current state.
    pub state: HealthState,
    /// Consecutive failed probes since the last success.
    pub ping_failures: u32,
    /// When the last probe completed, if ever.
    pub last_ping: Option<Instant>,
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self {
            state: HealthState::Unknown,
            ping_failures: 0,
            last_ping: None,
        }
    }
}

/// Internally synchronized health state for one connection.
///
/// Connection implementations embed one of these and delegate the health
/// half of [`Connection`](crate::Connection) to it. State, failure count and
/// last-ping time always change together under one lock, so concurrent
/// callers never observe a dead node with a stale timestamp. The lock is
/// never held across an `.await`.
#[derive(Debug, Default)]
pub struct HealthRecord {
    inner: Mutex<HealthSnapshot>,
}

impl HealthRecord {
    /// Creates a record in the [`HealthState::Unknown`] state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record that starts alive, for nodes known to be up.
    pub fn alive() -> Self {
        Self {
            inner: Mutex::new(HealthSnapshot {
                state: HealthState::Alive,
                ..HealthSnapshot::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HealthSnapshot> {
        // A poisoned record still holds valid plain data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current state, failure count and last-ping time together.
    pub fn snapshot(&self) -> HealthSnapshot {
        *self.lock()
    }

    /// Current state.
    pub fn state(&self) -> HealthState {
        self.lock().state
    }

    /// Whether the last probe succeeded.
    pub fn is_alive(&self) -> bool {
        self.lock().state.is_alive()
    }

    /// Consecutive failed probes.
    pub fn ping_failures(&self) -> u32 {
        self.lock().ping_failures
    }

    /// When the last probe completed.
    pub fn last_ping(&self) -> Option<Instant> {
        self.lock().last_ping
    }

    /// Records a successful probe: alive, failures reset to zero.
    pub fn mark_alive(&self, at: Instant) {
        let mut inner = self.lock();
        inner.state = HealthState::Alive;
        inner.ping_failures = 0;
        inner.last_ping = Some(at);
    }

    /// Records a failed probe and returns the new failure count.
    ///
    /// The counter saturates at `u32::MAX`.
    pub fn mark_dead(&self, at: Instant) -> u32 {
        let mut inner = self.lock();
        inner.state = HealthState::Dead;
        inner.ping_failures = inner.ping_failures.saturating_add(1);
        inner.last_ping = Some(at);
        inner.ping_failures
    }
}
