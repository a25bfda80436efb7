//! HTTP connections for nodepool.
//!
//! [`HttpConnection`] implements [`nodepool::Connection`] on top of a shared
//! `reqwest::Client`: a probe is a `HEAD` request to the node root, and only a
//! 2xx answer counts as alive. [`HttpConnectionFactory`] turns host
//! descriptors into connections for [`nodepool::ConnectionPool`].
//!
//! The [`endpoint`] module maps logical operations such as `indices.flush` to
//! a method, path and validated query, which
//! [`HttpConnection::url_for`] then resolves against whichever node the pool
//! hands out.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nodepool::ConnectionPool;
//! use nodepool_http::{Endpoint, HttpConnection, HttpConnectionFactory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = ConnectionPool::<HttpConnection>::builder()
//!     .name("search")
//!     .hosts(["http://node-1:9200", "http://node-2:9200"])
//!     .factory(HttpConnectionFactory::builder().build()?)
//!     .build()?;
//!
//! let target = Endpoint::lookup("cluster.stats")?.request().build();
//! let connection = pool.next_connection().await?;
//! let response = connection.request(&target).send().await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

mod connection;
pub mod endpoint;
mod factory;

pub use connection::{HttpConnection, DEFAULT_PROBE_TIMEOUT};
pub use endpoint::{Endpoint, EndpointError, RequestTarget, TargetBuilder};
pub use factory::{HttpConnectionFactory, HttpConnectionFactoryBuilder};
