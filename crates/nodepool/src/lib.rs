//! Node selection, liveness tracking and failover for multi-node clients.
//!
//! A [`ConnectionPool`] owns a fixed set of connections to backend nodes and
//! hands one out per request. It asks a [`Selector`] for a candidate, trusts
//! candidates that are already alive, probes the ones that are new or due for
//! revival, and skips dead ones that are still backing off. When nothing
//! answers, the caller gets [`PoolError::NoNodesAvailable`].
//!
//! # Revival
//!
//! A connection that fails a probe is marked dead and left alone for
//! `ping_timeout * 2^failures`, capped at `max_ping_timeout` (60 seconds and
//! one hour by default). Once that has elapsed, the next selection that lands
//! on it probes it again. Plug in a different [`RevivalSchedule`] to change
//! the curve.
//!
//! # Examples
//!
//! ```rust
//! use nodepool::{Connection, ConnectionPool, HealthRecord, Host, SelectionStrategy};
//! use std::time::{Duration, Instant};
//!
//! struct Node {
//!     host: Host,
//!     health: HealthRecord,
//!     up: bool,
//! }
//!
//! impl Connection for Node {
//!     fn host(&self) -> &Host { &self.host }
//!     async fn ping(&self) -> bool { self.up }
//!     fn is_alive(&self) -> bool { self.health.is_alive() }
//!     fn mark_alive(&self, at: Instant) { self.health.mark_alive(at) }
//!     fn mark_dead(&self, at: Instant) { self.health.mark_dead(at); }
//!     fn ping_failures(&self) -> u32 { self.health.ping_failures() }
//!     fn last_ping(&self) -> Option<Instant> { self.health.last_ping() }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = ConnectionPool::builder()
//!     .name("search")
//!     .selection_strategy(SelectionStrategy::RoundRobin)
//!     .ping_timeout(Duration::from_secs(30))
//!     .hosts(["node-1", "node-2", "node-3"])
//!     .factory(|host: &Host| -> Result<Node, std::convert::Infallible> {
//!         Ok(Node {
//!             host: host.clone(),
//!             health: HealthRecord::new(),
//!             up: host.host() != "node-1",
//!         })
//!     })
//!     .on_marked_dead(|host, failures| eprintln!("{host} down ({failures} failures)"))
//!     .build()?;
//!
//! // node-1 fails its probe, node-2 answers.
//! let connection = pool.next_connection().await?;
//! assert_eq!(connection.host().host(), "node-2");
//! # Ok(())
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: structured logs for selections, revivals, deaths and exhaustion
//! - `metrics`: counters for selections, probes and exhaustion, plus a
//!   per-connection liveness gauge
//! - `serde`: `Serialize`/`Deserialize` for [`PoolConfig`],
//!   [`SelectionStrategy`] and [`Host`]

mod config;
mod connection;
mod error;
mod events;
mod factory;
mod health;
mod host;
mod pool;
mod revival;
mod selector;

pub use config::{PoolConfig, PoolConfigBuilder, DEFAULT_POOL_NAME};
pub use connection::Connection;
pub use error::{BuildError, PoolError, Result};
pub use events::ConnectionPoolEvent;
pub use factory::{BoxError, ConnectionFactory};
pub use health::{HealthRecord, HealthSnapshot, HealthState};
pub use host::{Host, HostParseError, Scheme, DEFAULT_PORT};
pub use pool::{ConnectionDetail, ConnectionPool, ConnectionPoolBuilder, Eligibility};
pub use revival::{
    ExponentialRevival, FixedRevival, RevivalSchedule, DEFAULT_MAX_PING_TIMEOUT,
    DEFAULT_PING_TIMEOUT,
};
pub use selector::{
    RandomSelector, RoundRobinSelector, SelectionStrategy, Selector, StickyRoundRobinSelector,
};

pub use nodepool_core::{Clock, EventListener, FnListener, ManualClock, PoolEvent, SystemClock};
