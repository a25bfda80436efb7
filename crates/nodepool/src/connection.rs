//! The connection capability consumed by the pool.

use crate::Host;
use std::future::Future;
use std::time::Instant;

/// One backend node as seen by the pool.
///
/// The pool only selects connections and drives their health transitions;
/// the transport behind [`ping`](Connection::ping) is up to the implementor.
/// Most implementations embed a [`HealthRecord`](crate::HealthRecord) and
/// delegate every method except `host` and `ping` to it.
///
/// # Examples
///
/// ```rust
/// use nodepool::{Connection, HealthRecord, Host};
/// use std::time::Instant;
///
/// struct TcpNode {
///     host: Host,
///     health: HealthRecord,
/// }
///
/// impl Connection for TcpNode {
///     fn host(&self) -> &Host {
///         &self.host
///     }
///
///     async fn ping(&self) -> bool {
///         let addr = format!("{}:{}", self.host.host(), self.host.port());
///         tokio::net::TcpStream::connect(addr).await.is_ok()
///     }
///
///     fn is_alive(&self) -> bool {
///         self.health.is_alive()
///     }
///
///     fn mark_alive(&self, at: Instant) {
///         self.health.mark_alive(at)
///     }
///
///     fn mark_dead(&self, at: Instant) {
///         self.health.mark_dead(at);
///     }
///
///     fn ping_failures(&self) -> u32 {
///         self.health.ping_failures()
///     }
///
///     fn last_ping(&self) -> Option<Instant> {
///         self.health.last_ping()
///     }
/// }
/// ```
pub trait Connection: Send + Sync + 'static {
    /// The node this connection talks to.
    fn host(&self) -> &Host;

    /// Probes the node. `true` means it answered.
    ///
    /// A probe must not change health state itself; the pool records the
    /// outcome through [`mark_alive`](Connection::mark_alive) or
    /// [`mark_dead`](Connection::mark_dead). Implementations are expected to
    /// bound the probe with their own timeout.
    fn ping(&self) -> impl Future<Output = bool> + Send;

    /// Whether the node is currently considered alive.
    fn is_alive(&self) -> bool;

    /// Marks the node alive after a successful probe and resets its failure
    /// count.
    fn mark_alive(&self, at: Instant);

    /// Marks the node dead after a failed probe, increments its failure
    /// count and records `at` as the last ping.
    fn mark_dead(&self, at: Instant);

    /// Consecutive failed probes since the node was last alive.
    fn ping_failures(&self) -> u32;

    /// When the node was last probed.
    fn last_ping(&self) -> Option<Instant>;
}
