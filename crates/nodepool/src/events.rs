use crate::Host;
use nodepool_core::PoolEvent;
use std::time::{Duration, Instant};

/// Events emitted by a [`ConnectionPool`](crate::ConnectionPool).
#[derive(Debug, Clone)]
pub enum ConnectionPoolEvent {
    /// A connection was handed to the caller.
    Selected {
        pool_name: String,
        timestamp: Instant,
        host: Host,
        /// Whether the connection was probed in this call.
        probed: bool,
    },
    /// A probe succeeded on a connection that was not alive.
    Revived {
        pool_name: String,
        timestamp: Instant,
        host: Host,
        /// Failures accumulated before this probe.
        previous_failures: u32,
    },
    /// A probe failed and the connection was marked dead.
    MarkedDead {
        pool_name: String,
        timestamp: Instant,
        host: Host,
        ping_failures: u32,
        /// Wait before the connection becomes eligible again.
        retry_after: Duration,
    },
    /// A dead connection was passed over because its revival time has not come.
    Skipped {
        pool_name: String,
        timestamp: Instant,
        host: Host,
        ping_failures: u32,
        /// Time left until the connection becomes eligible.
        remaining: Duration,
    },
    /// No live connection was found.
    Exhausted {
        pool_name: String,
        timestamp: Instant,
        attempts: usize,
    },
}

impl ConnectionPoolEvent {
    /// The host the event concerns, if any.
    pub fn host(&self) -> Option<&Host> {
        match self {
            ConnectionPoolEvent::Selected { host, .. }
            | ConnectionPoolEvent::Revived { host, .. }
            | ConnectionPoolEvent::MarkedDead { host, .. }
            | ConnectionPoolEvent::Skipped { host, .. } => Some(host),
            ConnectionPoolEvent::Exhausted { .. } => None,
        }
    }
}

impl PoolEvent for ConnectionPoolEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ConnectionPoolEvent::Selected { .. } => "selected",
            ConnectionPoolEvent::Revived { .. } => "revived",
            ConnectionPoolEvent::MarkedDead { .. } => "marked_dead",
            ConnectionPoolEvent::Skipped { .. } => "skipped",
            ConnectionPoolEvent::Exhausted { .. } => "exhausted",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ConnectionPoolEvent::Selected { timestamp, .. }
            | ConnectionPoolEvent::Revived { timestamp, .. }
            | ConnectionPoolEvent::MarkedDead { timestamp, .. }
            | ConnectionPoolEvent::Skipped { timestamp, .. }
            | ConnectionPoolEvent::Exhausted { timestamp, .. } => *timestamp,
        }
    }

    fn pool_name(&self) -> &str {
        match self {
            ConnectionPoolEvent::Selected { pool_name, .. }
            | ConnectionPoolEvent::Revived { pool_name, .. }
            | ConnectionPoolEvent::MarkedDead { pool_name, .. }
            | ConnectionPoolEvent::Skipped { pool_name, .. }
            | ConnectionPoolEvent::Exhausted { pool_name, .. } => pool_name,
        }
    }
}
