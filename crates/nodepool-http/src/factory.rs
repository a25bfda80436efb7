use crate::connection::{HttpConnection, DEFAULT_PROBE_TIMEOUT};
use nodepool::{BoxError, ConnectionFactory, Host};
use reqwest::Client;
use std::time::Duration;

/// Builds [`HttpConnection`]s that share one client.
///
/// ```
/// use nodepool::ConnectionPool;
/// use nodepool_http::{HttpConnection, HttpConnectionFactory};
/// use std::time::Duration;
///
/// let factory = HttpConnectionFactory::builder()
///     .probe_timeout(Duration::from_millis(500))
///     .build()
///     .unwrap();
///
/// let pool: ConnectionPool<HttpConnection> = ConnectionPool::builder()
///     .hosts(["node-1:9200", "node-2:9200"])
///     .factory(factory)
///     .build()
///     .unwrap();
/// assert_eq!(pool.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HttpConnectionFactory {
    client: Client,
    probe_timeout: Duration,
}

impl HttpConnectionFactory {
    /// Create a new builder.
    pub fn builder() -> HttpConnectionFactoryBuilder {
        HttpConnectionFactoryBuilder::default()
    }

    /// A factory around an existing client with the default probe timeout.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// The bound applied to every probe.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }
}

impl ConnectionFactory<HttpConnection> for HttpConnectionFactory {
    fn create(&self, host: &Host) -> Result<HttpConnection, BoxError> {
        let connection = HttpConnection::new(host.clone(), self.client.clone())?;
        Ok(connection.with_probe_timeout(self.probe_timeout))
    }
}

/// Builder for `HttpConnectionFactory`.
#[derive(Debug, Default)]
pub struct HttpConnectionFactoryBuilder {
    client: Option<Client>,
    probe_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl HttpConnectionFactoryBuilder {
    /// Use an existing client. Overrides [`connect_timeout`](Self::connect_timeout).
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the bound on a single probe.
    ///
    /// Default: 1 second
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    /// Set the TCP connect timeout of the client this builder creates.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the factory, creating a client unless one was supplied.
    pub fn build(self) -> Result<HttpConnectionFactory, reqwest::Error> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };
        Ok(HttpConnectionFactory {
            client,
            probe_timeout: self.probe_timeout.unwrap_or(DEFAULT_PROBE_TIMEOUT),
        })
    }
}
