//! Error types for connection pools.

use crate::factory::BoxError;
use crate::{Host, HostParseError};

/// Errors returned when asking a pool for a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Every attempt in this call ended without a live connection.
    #[error("No alive nodes found in your cluster")]
    NoNodesAvailable {
        /// Name of the exhausted pool.
        pool: String,
        /// Selection attempts made before giving up, plus any last-resort
        /// probes of skipped connections.
        attempts: usize,
    },
}

impl PoolError {
    /// Returns true for [`PoolError::NoNodesAvailable`].
    pub fn is_no_nodes_available(&self) -> bool {
        matches!(self, PoolError::NoNodesAvailable { .. })
    }
}

/// Result type for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors returned while building a pool.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Neither connections nor hosts were supplied.
    #[error("a connection pool needs at least one connection")]
    NoConnections,
    /// Hosts were supplied without a factory to turn them into connections.
    #[error("{hosts} host(s) configured but no connection factory was set")]
    MissingFactory {
        /// Number of hosts waiting for a factory.
        hosts: usize,
    },
    /// The factory failed for one host.
    #[error("failed to create a connection for {host}")]
    Factory {
        /// The host the factory was called with.
        host: Host,
        /// The factory's error.
        #[source]
        source: BoxError,
    },
    /// A host descriptor did not parse.
    #[error(transparent)]
    InvalidHost(#[from] HostParseError),
}
