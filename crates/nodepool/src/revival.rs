//! How long a dead connection waits before it may be probed again.

use std::time::Duration;

/// Default base timeout for the first failure.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(60);

/// Default ceiling on the revival timeout.
pub const DEFAULT_MAX_PING_TIMEOUT: Duration = Duration::from_secs(3600);

/// Maps a failure count to the wait before the next revival probe.
///
/// Implementations must be pure: the same failure count always yields the
/// same timeout. The pool adds the result to the connection's last ping time.
pub trait RevivalSchedule: Send + Sync {
    /// Wait after `ping_failures` consecutive failed probes.
    fn revival_timeout(&self, ping_failures: u32) -> Duration;
}

impl<F> RevivalSchedule for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn revival_timeout(&self, ping_failures: u32) -> Duration {
        self(ping_failures)
    }
}

/// Exponential backoff: `base * 2^failures`, capped at `max`.
///
/// With the defaults a node that failed once waits two minutes, then four,
/// eight, and so on until the one-hour ceiling.
///
/// ```
/// use nodepool::{ExponentialRevival, RevivalSchedule};
/// use std::time::Duration;
///
/// let schedule = ExponentialRevival::new(Duration::from_secs(60), Duration::from_secs(3600));
/// assert_eq!(schedule.revival_timeout(1), Duration::from_secs(120));
/// assert_eq!(schedule.revival_timeout(3), Duration::from_secs(480));
/// assert_eq!(schedule.revival_timeout(30), Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialRevival {
    base: Duration,
    max: Duration,
}

impl ExponentialRevival {
    /// Creates a schedule with the given base and ceiling.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// The base timeout.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The ceiling.
    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for ExponentialRevival {
    fn default() -> Self {
        Self::new(DEFAULT_PING_TIMEOUT, DEFAULT_MAX_PING_TIMEOUT)
    }
}

impl RevivalSchedule for ExponentialRevival {
    fn revival_timeout(&self, ping_failures: u32) -> Duration {
        let factor = 1u32.checked_shl(ping_failures).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }
}

/// The same wait regardless of how often the node failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRevival(pub Duration);

impl RevivalSchedule for FixedRevival {
    fn revival_timeout(&self, _ping_failures: u32) -> Duration {
        self.0
    }
}
