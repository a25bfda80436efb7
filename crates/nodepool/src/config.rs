//! Configuration for connection pools.

use crate::revival::{DEFAULT_MAX_PING_TIMEOUT, DEFAULT_PING_TIMEOUT};
use crate::SelectionStrategy;
use std::time::Duration;

/// Default pool name used in events, logs and metrics.
pub const DEFAULT_POOL_NAME: &str = "nodepool";

/// Plain configuration for a [`ConnectionPool`](crate::ConnectionPool).
///
/// With the `serde` feature the record loads from any serde format; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PoolConfig {
    /// Name used in events, logs and metrics
    pub(crate) name: String,

    /// Shuffle connections once at construction
    pub(crate) randomize_hosts: bool,

    /// Built-in selector to use when none is given explicitly
    pub(crate) selection_strategy: SelectionStrategy,

    /// Base revival timeout
    pub(crate) ping_timeout: Duration,

    /// Ceiling on the revival timeout
    pub(crate) max_ping_timeout: Duration,

    /// Probe skipped dead connections once before giving up
    pub(crate) probe_skipped_when_exhausted: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_POOL_NAME.to_string(),
            randomize_hosts: false,
            selection_strategy: SelectionStrategy::default(),
            ping_timeout: DEFAULT_PING_TIMEOUT,
            max_ping_timeout: DEFAULT_MAX_PING_TIMEOUT,
            probe_skipped_when_exhausted: false,
        }
    }
}

impl PoolConfig {
    /// Create a new builder.
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }

    /// Get the pool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether connections are shuffled at construction.
    pub fn randomize_hosts(&self) -> bool {
        self.randomize_hosts
    }

    /// Get the selection strategy.
    pub fn selection_strategy(&self) -> SelectionStrategy {
        self.selection_strategy
    }

    /// Get the base revival timeout.
    pub fn ping_timeout(&self) -> Duration {
        self.ping_timeout
    }

    /// Get the revival timeout ceiling.
    pub fn max_ping_timeout(&self) -> Duration {
        self.max_ping_timeout
    }

    /// Whether skipped connections get a last-resort probe.
    pub fn probe_skipped_when_exhausted(&self) -> bool {
        self.probe_skipped_when_exhausted
    }
}

/// Builder for `PoolConfig`.
#[derive(Debug, Default)]
pub struct PoolConfigBuilder {
    name: Option<String>,
    randomize_hosts: Option<bool>,
    selection_strategy: Option<SelectionStrategy>,
    ping_timeout: Option<Duration>,
    max_ping_timeout: Option<Duration>,
    probe_skipped_when_exhausted: Option<bool>,
}

impl PoolConfigBuilder {
    /// Set the pool name.
    ///
    /// Default: `"nodepool"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Shuffle the connection order once at construction.
    ///
    /// Default: false
    pub fn randomize_hosts(mut self, randomize: bool) -> Self {
        self.randomize_hosts = Some(randomize);
        self
    }

    /// Set the selection strategy.
    ///
    /// Default: `SelectionStrategy::RoundRobin`
    pub fn selection_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.selection_strategy = Some(strategy);
        self
    }

    /// Set the base revival timeout.
    ///
    /// Default: 60 seconds
    pub fn ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = Some(timeout);
        self
    }

    /// Set the revival timeout ceiling.
    ///
    /// Default: 3600 seconds
    pub fn max_ping_timeout(mut self, timeout: Duration) -> Self {
        self.max_ping_timeout = Some(timeout);
        self
    }

    /// Probe every skipped dead connection once before reporting exhaustion.
    ///
    /// Default: false
    pub fn probe_skipped_when_exhausted(mut self, enabled: bool) -> Self {
        self.probe_skipped_when_exhausted = Some(enabled);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> PoolConfig {
        let default = PoolConfig::default();
        PoolConfig {
            name: self.name.unwrap_or(default.name),
            randomize_hosts: self.randomize_hosts.unwrap_or(default.randomize_hosts),
            selection_strategy: self
                .selection_strategy
                .unwrap_or(default.selection_strategy),
            ping_timeout: self.ping_timeout.unwrap_or(default.ping_timeout),
            max_ping_timeout: self.max_ping_timeout.unwrap_or(default.max_ping_timeout),
            probe_skipped_when_exhausted: self
                .probe_skipped_when_exhausted
                .unwrap_or(default.probe_skipped_when_exhausted),
        }
    }
}
