//! The connection pool: selection, liveness checks and failover.

use crate::config::PoolConfig;
use crate::error::{BuildError, PoolError, Result};
use crate::events::ConnectionPoolEvent;
use crate::factory::ConnectionFactory;
use crate::revival::{ExponentialRevival, RevivalSchedule};
use crate::{Connection, HealthState, Host, HostParseError, SelectionStrategy, Selector};
use nodepool_core::{Clock, EventListener, EventListeners, FnListener, SystemClock};
use rand::seq::SliceRandom;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

/// Whether a connection may be probed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Alive, or never failed.
    Immediate,
    /// Dead, and its revival timeout has elapsed.
    RevivalDue,
    /// Dead, and still waiting out its revival timeout.
    PendingRevival {
        /// Time left until the next probe is allowed.
        remaining: Duration,
    },
}

/// Point-in-time health of one pooled connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDetail {
    /// The node.
    pub host: Host,
    /// Derived liveness state.
    pub state: HealthState,
    /// Consecutive failed probes.
    pub ping_failures: u32,
    /// When the node was last probed.
    pub last_ping: Option<Instant>,
    /// Whether the next selection may probe it.
    pub eligibility: Eligibility,
}

/// A fixed set of connections with failover.
///
/// Every call to [`next_connection`](ConnectionPool::next_connection) asks
/// the selector for a candidate among *all* connections. Alive candidates are
/// returned straight away. Unknown and revival-due candidates are probed, and
/// dead candidates still waiting out their revival timeout are skipped. After
/// one attempt per connection the call fails with
/// [`PoolError::NoNodesAvailable`]. Its `attempts` also counts any last-resort
/// probes of skipped connections.
///
/// The pool holds no lock of its own and is meant to be shared as
/// `Arc<ConnectionPool<C>>`.
///
/// # Examples
///
/// ```rust
/// use nodepool::{Connection, ConnectionPool, HealthRecord, Host};
/// use std::time::Instant;
///
/// struct Node {
///     host: Host,
///     health: HealthRecord,
/// }
///
/// impl Connection for Node {
///     fn host(&self) -> &Host { &self.host }
///     async fn ping(&self) -> bool { true }
///     fn is_alive(&self) -> bool { self.health.is_alive() }
///     fn mark_alive(&self, at: Instant) { self.health.mark_alive(at) }
///     fn mark_dead(&self, at: Instant) { self.health.mark_dead(at); }
///     fn ping_failures(&self) -> u32 { self.health.ping_failures() }
///     fn last_ping(&self) -> Option<Instant> { self.health.last_ping() }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = ConnectionPool::builder()
///     .name("search")
///     .hosts(["node-1:9200", "node-2:9200"])
///     .factory(|host: &Host| -> Result<Node, std::convert::Infallible> {
///         Ok(Node { host: host.clone(), health: HealthRecord::new() })
///     })
///     .build()?;
///
/// let connection = pool.next_connection().await?;
/// assert_eq!(connection.host().host(), "node-1");
/// assert!(connection.is_alive());
/// # Ok(())
/// # }
/// ```
pub struct ConnectionPool<C> {
    config: PoolConfig,
    connections: Vec<Arc<C>>,
    selector: Box<dyn Selector<C>>,
    revival: Box<dyn RevivalSchedule>,
    clock: Arc<dyn Clock>,
    event_listeners: EventListeners<ConnectionPoolEvent>,
}

impl<C: Connection> ConnectionPool<C> {
    /// Create a new builder.
    pub fn builder() -> ConnectionPoolBuilder<C> {
        ConnectionPoolBuilder::new()
    }

    /// Builds a pool over `connections` with the default configuration.
    pub fn new<I>(connections: I) -> std::result::Result<Self, BuildError>
    where
        I: IntoIterator<Item = C>,
    {
        Self::builder().connections(connections).build()
    }

    /// Returns a live connection, probing where needed.
    ///
    /// Same as `next_connection_with(false)`.
    pub async fn next_connection(&self) -> Result<Arc<C>> {
        self.next_connection_with(false).await
    }

    /// Returns a live connection.
    ///
    /// With `force` set, an alive candidate is probed instead of being
    /// returned on trust.
    pub async fn next_connection_with(&self, force: bool) -> Result<Arc<C>> {
        let total = self.connections.len();
        let mut probed = vec![false; total];
        let mut skipped: Vec<usize> = Vec::new();

        for _ in 0..total {
            let Some(index) = self
                .selector
                .select(&self.connections)
                .filter(|&index| index < total)
            else {
                continue;
            };
            let connection = &self.connections[index];

            if !force && connection.is_alive() {
                self.record_fast_path(connection);
                return Ok(Arc::clone(connection));
            }

            if probed[index] {
                continue;
            }

            if let Eligibility::PendingRevival { remaining } =
                self.eligibility(connection, self.clock.now())
            {
                if !skipped.contains(&index) {
                    skipped.push(index);
                    self.record_skip(connection, remaining);
                }
                continue;
            }

            probed[index] = true;
            if self.probe(connection).await {
                return Ok(Arc::clone(connection));
            }
        }

        let mut attempts = total;
        if self.config.probe_skipped_when_exhausted {
            for index in skipped {
                if probed[index] {
                    continue;
                }
                probed[index] = true;
                attempts += 1;
                let connection = &self.connections[index];
                if self.probe(connection).await {
                    return Ok(Arc::clone(connection));
                }
            }
        }

        Err(self.exhausted(attempts))
    }

    /// All connections in selection order.
    pub fn connections(&self) -> &[Arc<C>] {
        &self.connections
    }

    /// Number of connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Always false; a pool cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// The pool name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The configuration the pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Health and eligibility of every connection, in selection order.
    pub fn health_details(&self) -> Vec<ConnectionDetail> {
        let now = self.clock.now();
        self.connections
            .iter()
            .map(|connection| {
                let ping_failures = connection.ping_failures();
                let state = if connection.is_alive() {
                    HealthState::Alive
                } else if ping_failures > 0 {
                    HealthState::Dead
                } else {
                    HealthState::Unknown
                };
                ConnectionDetail {
                    host: connection.host().clone(),
                    state,
                    ping_failures,
                    last_ping: connection.last_ping(),
                    eligibility: self.eligibility(connection, now),
                }
            })
            .collect()
    }

    fn eligibility(&self, connection: &C, now: Instant) -> Eligibility {
        if connection.is_alive() {
            return Eligibility::Immediate;
        }
        let failures = connection.ping_failures();
        if failures == 0 {
            return Eligibility::Immediate;
        }
        let Some(last_ping) = connection.last_ping() else {
            return Eligibility::RevivalDue;
        };
        let wait = self.revival.revival_timeout(failures);
        let elapsed = now.saturating_duration_since(last_ping);
        if elapsed >= wait {
            Eligibility::RevivalDue
        } else {
            Eligibility::PendingRevival {
                remaining: wait - elapsed,
            }
        }
    }

    /// Probes one connection and records the outcome. Returns whether it is alive.
    async fn probe(&self, connection: &Arc<C>) -> bool {
        let was_alive = connection.is_alive();
        let previous_failures = connection.ping_failures();

        let alive = connection.ping().await;
        let now = self.clock.now();

        #[cfg(feature = "metrics")]
        {
            counter!(
                "nodepool_probes_total",
                "pool" => self.config.name.clone(),
                "result" => if alive { "alive" } else { "dead" }
            )
            .increment(1);
            gauge!(
                "nodepool_connection_alive",
                "pool" => self.config.name.clone(),
                "host" => connection.host().to_string()
            )
            .set(if alive { 1.0 } else { 0.0 });
        }

        if alive {
            connection.mark_alive(now);

            if !was_alive {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    pool = %self.config.name,
                    host = %connection.host(),
                    ping_failures = previous_failures,
                    "connection revived"
                );

                self.emit(|| ConnectionPoolEvent::Revived {
                    pool_name: self.config.name.clone(),
                    timestamp: now,
                    host: connection.host().clone(),
                    previous_failures,
                });
            }

            #[cfg(feature = "metrics")]
            counter!(
                "nodepool_selections_total",
                "pool" => self.config.name.clone(),
                "path" => "probed"
            )
            .increment(1);

            self.emit(|| ConnectionPoolEvent::Selected {
                pool_name: self.config.name.clone(),
                timestamp: now,
                host: connection.host().clone(),
                probed: true,
            });
        } else {
            connection.mark_dead(now);
            let ping_failures = connection.ping_failures();
            let retry_after = self.revival.revival_timeout(ping_failures);

            #[cfg(feature = "tracing")]
            tracing::warn!(
                pool = %self.config.name,
                host = %connection.host(),
                ping_failures,
                retry_in = ?retry_after,
                "connection marked dead"
            );

            self.emit(|| ConnectionPoolEvent::MarkedDead {
                pool_name: self.config.name.clone(),
                timestamp: now,
                host: connection.host().clone(),
                ping_failures,
                retry_after,
            });
        }

        alive
    }

    fn record_fast_path(&self, connection: &C) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            pool = %self.config.name,
            host = %connection.host(),
            "alive connection selected"
        );

        #[cfg(feature = "metrics")]
        counter!(
            "nodepool_selections_total",
            "pool" => self.config.name.clone(),
            "path" => "fast"
        )
        .increment(1);

        self.emit(|| ConnectionPoolEvent::Selected {
            pool_name: self.config.name.clone(),
            timestamp: self.clock.now(),
            host: connection.host().clone(),
            probed: false,
        });
    }

    fn record_skip(&self, connection: &C, remaining: Duration) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            pool = %self.config.name,
            host = %connection.host(),
            ping_failures = connection.ping_failures(),
            retry_in = ?remaining,
            "dead connection skipped"
        );

        self.emit(|| ConnectionPoolEvent::Skipped {
            pool_name: self.config.name.clone(),
            timestamp: self.clock.now(),
            host: connection.host().clone(),
            ping_failures: connection.ping_failures(),
            remaining,
        });
    }

    fn exhausted(&self, attempts: usize) -> PoolError {
        #[cfg(feature = "tracing")]
        tracing::error!(pool = %self.config.name, attempts, "no alive nodes found");

        #[cfg(feature = "metrics")]
        counter!("nodepool_exhausted_total", "pool" => self.config.name.clone()).increment(1);

        self.emit(|| ConnectionPoolEvent::Exhausted {
            pool_name: self.config.name.clone(),
            timestamp: self.clock.now(),
            attempts,
        });

        PoolError::NoNodesAvailable {
            pool: self.config.name.clone(),
            attempts,
        }
    }

    fn emit(&self, event: impl FnOnce() -> ConnectionPoolEvent) {
        if !self.event_listeners.is_empty() {
            self.event_listeners.emit(&event());
        }
    }
}

impl<C> fmt::Debug for ConnectionPool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("config", &self.config)
            .field("connections", &self.connections.len())
            .field("event_listeners", &self.event_listeners)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ConnectionPool`].
///
/// Connections come from two sources: ones handed over directly, and hosts
/// turned into connections by a [`ConnectionFactory`]. Direct connections
/// come first, then factory-built ones, each in insertion order.
pub struct ConnectionPoolBuilder<C> {
    config: PoolConfig,
    connections: Vec<Arc<C>>,
    hosts: Vec<std::result::Result<Host, HostParseError>>,
    factory: Option<Box<dyn ConnectionFactory<C>>>,
    selector: Option<Box<dyn Selector<C>>>,
    revival: Option<Box<dyn RevivalSchedule>>,
    clock: Option<Arc<dyn Clock>>,
    event_listeners: EventListeners<ConnectionPoolEvent>,
}

impl<C: Connection> ConnectionPoolBuilder<C> {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
            connections: Vec::new(),
            hosts: Vec::new(),
            factory: None,
            selector: None,
            revival: None,
            clock: None,
            event_listeners: EventListeners::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the pool name used in events, logs and metrics.
    ///
    /// Default: `"nodepool"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Shuffle the connection order once at build time.
    ///
    /// Default: false
    pub fn randomize_hosts(mut self, randomize: bool) -> Self {
        self.config.randomize_hosts = randomize;
        self
    }

    /// Pick a built-in selector. Ignored when [`selector`](Self::selector) is set.
    ///
    /// Default: `SelectionStrategy::RoundRobin`
    pub fn selection_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.config.selection_strategy = strategy;
        self
    }

    /// Use a custom selector.
    pub fn selector<S>(mut self, selector: S) -> Self
    where
        S: Selector<C> + 'static,
    {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Base revival timeout for the default exponential schedule.
    ///
    /// Default: 60 seconds
    pub fn ping_timeout(mut self, timeout: Duration) -> Self {
        self.config.ping_timeout = timeout;
        self
    }

    /// Revival timeout ceiling for the default exponential schedule.
    ///
    /// Default: 3600 seconds
    pub fn max_ping_timeout(mut self, timeout: Duration) -> Self {
        self.config.max_ping_timeout = timeout;
        self
    }

    /// Use a custom revival schedule instead of the exponential one.
    pub fn revival_schedule<R>(mut self, schedule: R) -> Self
    where
        R: RevivalSchedule + 'static,
    {
        self.revival = Some(Box::new(schedule));
        self
    }

    /// Probe every skipped dead connection once before reporting exhaustion.
    ///
    /// Default: false
    pub fn probe_skipped_when_exhausted(mut self, enabled: bool) -> Self {
        self.config.probe_skipped_when_exhausted = enabled;
        self
    }

    /// Use a custom time source.
    pub fn clock<K>(mut self, clock: K) -> Self
    where
        K: Clock + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Add a connection.
    pub fn connection(mut self, connection: C) -> Self {
        self.connections.push(Arc::new(connection));
        self
    }

    /// Add several connections.
    pub fn connections<I>(mut self, connections: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        self.connections
            .extend(connections.into_iter().map(Arc::new));
        self
    }

    /// Add a host for the factory to connect to.
    ///
    /// Accepts a [`Host`] or a descriptor string; parse errors surface from
    /// [`build`](Self::build).
    pub fn host<H>(mut self, host: H) -> Self
    where
        H: TryInto<Host>,
        H::Error: Into<HostParseError>,
    {
        self.hosts.push(host.try_into().map_err(Into::into));
        self
    }

    /// Add several hosts.
    pub fn hosts<I, H>(self, hosts: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: TryInto<Host>,
        H::Error: Into<HostParseError>,
    {
        hosts
            .into_iter()
            .fold(self, |builder, host| builder.host(host))
    }

    /// Set the factory that turns hosts into connections.
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: ConnectionFactory<C> + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Register an event listener.
    pub fn on_event<L>(mut self, listener: L) -> Self
    where
        L: EventListener<ConnectionPoolEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }

    /// Callback when a probe marks a connection dead.
    ///
    /// The callback receives: (host, ping_failures)
    pub fn on_marked_dead<F>(self, f: F) -> Self
    where
        F: Fn(&Host, u32) + Send + Sync + 'static,
    {
        self.on_event(FnListener::new(move |event: &ConnectionPoolEvent| {
            if let ConnectionPoolEvent::MarkedDead {
                host,
                ping_failures,
                ..
            } = event
            {
                f(host, *ping_failures);
            }
        }))
    }

    /// Callback when a dead or unknown connection answers a probe.
    pub fn on_revived<F>(self, f: F) -> Self
    where
        F: Fn(&Host) + Send + Sync + 'static,
    {
        self.on_event(FnListener::new(move |event: &ConnectionPoolEvent| {
            if let ConnectionPoolEvent::Revived { host, .. } = event {
                f(host);
            }
        }))
    }

    /// Callback when a call finds no live connection.
    ///
    /// The callback receives the number of attempts made.
    pub fn on_exhausted<F>(self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_event(FnListener::new(move |event: &ConnectionPoolEvent| {
            if let ConnectionPoolEvent::Exhausted { attempts, .. } = event {
                f(*attempts);
            }
        }))
    }

    /// Build the pool.
    pub fn build(self) -> std::result::Result<ConnectionPool<C>, BuildError> {
        let hosts = self
            .hosts
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut connections = self.connections;
        if !hosts.is_empty() {
            let factory = self
                .factory
                .ok_or(BuildError::MissingFactory { hosts: hosts.len() })?;
            connections.reserve(hosts.len());
            for host in hosts {
                match factory.create(&host) {
                    Ok(connection) => connections.push(Arc::new(connection)),
                    Err(source) => return Err(BuildError::Factory { host, source }),
                }
            }
        }

        if connections.is_empty() {
            return Err(BuildError::NoConnections);
        }

        if self.config.randomize_hosts {
            connections.shuffle(&mut rand::rng());
        }

        let selector = self
            .selector
            .unwrap_or_else(|| self.config.selection_strategy.into_selector());
        let revival = self.revival.unwrap_or_else(|| {
            Box::new(ExponentialRevival::new(
                self.config.ping_timeout,
                self.config.max_ping_timeout,
            ))
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            pool = %self.config.name,
            connections = connections.len(),
            strategy = ?self.config.selection_strategy,
            "connection pool built"
        );

        Ok(ConnectionPool {
            config: self.config,
            connections,
            selector,
            revival,
            clock,
            event_listeners: self.event_listeners,
        })
    }
}

impl<C: Connection> Default for ConnectionPoolBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
