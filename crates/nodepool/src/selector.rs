//! Selection strategies for choosing the next candidate connection.
//!
//! A selector only picks; it never probes. The pool hands it the full,
//! unfiltered connection list and inspects the candidate's health afterwards,
//! so a round-robin cursor stays fair across dead and alive nodes alike.

use crate::Connection;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Trait for implementing selection strategies.
///
/// Returns the index of the chosen connection, or `None` when the slice is
/// empty. The pool counts a `None` or an out-of-range index as a spent
/// attempt.
///
/// # Examples
///
/// ```rust
/// use nodepool::Selector;
/// use std::sync::Arc;
///
/// // Always prefer the last node, e.g. a local replica.
/// struct LastSelector;
///
/// impl<C> Selector<C> for LastSelector {
///     fn select(&self, connections: &[Arc<C>]) -> Option<usize> {
///         connections.len().checked_sub(1)
///     }
/// }
/// ```
pub trait Selector<C>: Send + Sync {
    /// Select a connection from the ordered list.
    fn select(&self, connections: &[Arc<C>]) -> Option<usize>;
}

impl<C, F> Selector<C> for F
where
    F: Fn(&[Arc<C>]) -> Option<usize> + Send + Sync,
{
    fn select(&self, connections: &[Arc<C>]) -> Option<usize> {
        self(connections)
    }
}

/// Built-in selection strategies, nameable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SelectionStrategy {
    /// Cycle through connections in order.
    /// Best for: Even distribution of load.
    #[default]
    RoundRobin,

    /// Stay on one connection until it fails, then move to the next.
    /// Best for: Connection reuse and keep-alive friendliness.
    StickyRoundRobin,

    /// Pick uniformly at random.
    /// Best for: Many clients sharing one node list without coordination.
    Random,
}

impl SelectionStrategy {
    pub(crate) fn into_selector<C: Connection>(self) -> Box<dyn Selector<C>> {
        match self {
            SelectionStrategy::RoundRobin => Box::new(RoundRobinSelector::new()),
            SelectionStrategy::StickyRoundRobin => Box::new(StickyRoundRobinSelector::new()),
            SelectionStrategy::Random => Box::new(RandomSelector),
        }
    }
}

/// Round-robin selector.
///
/// One atomic cursor shared by every caller. Each call takes the next slot,
/// so concurrent callers never receive the same slot twice within a cycle.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    cursor: AtomicUsize,
}

impl RoundRobinSelector {
    /// Creates a selector starting at the first connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor value (for diagnostics).
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

impl<C> Selector<C> for RoundRobinSelector {
    fn select(&self, connections: &[Arc<C>]) -> Option<usize> {
        if connections.is_empty() {
            return None;
        }
        let slot = self.cursor.fetch_add(1, Ordering::Relaxed);
        Some(slot % connections.len())
    }
}

/// Sticky round-robin selector.
///
/// Returns the current connection for as long as it is alive or has never
/// failed. Once it has failed, the cursor moves one step and the next
/// connection is returned.
#[derive(Debug, Default)]
pub struct StickyRoundRobinSelector {
    cursor: AtomicUsize,
}

impl StickyRoundRobinSelector {
    /// Creates a selector stuck to the first connection.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Connection> Selector<C> for StickyRoundRobinSelector {
    fn select(&self, connections: &[Arc<C>]) -> Option<usize> {
        if connections.is_empty() {
            return None;
        }
        let len = connections.len();
        let current = self.cursor.load(Ordering::Acquire) % len;
        let candidate = &connections[current];
        if candidate.is_alive() || candidate.ping_failures() == 0 {
            return Some(current);
        }
        // Two callers racing here may both advance; that only moves the
        // sticky choice one extra step.
        let next = self.cursor.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        Some(next % len)
    }
}

/// Uniformly random selector.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl<C> Selector<C> for RandomSelector {
    fn select(&self, connections: &[Arc<C>]) -> Option<usize> {
        if connections.is_empty() {
            return None;
        }
        Some(rand::rng().random_range(0..connections.len()))
    }
}
