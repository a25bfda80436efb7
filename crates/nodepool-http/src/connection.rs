use crate::endpoint::RequestTarget;
use nodepool::{Connection, HealthRecord, HealthSnapshot, Host};
use reqwest::{Client, Url};
use std::fmt;
use std::time::{Duration, Instant};

/// Default bound on a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// A node reached over HTTP.
///
/// Probes send `HEAD /` (below the host's path prefix) and count any 2xx
/// answer within the probe timeout as alive. Connections built by one
/// [`HttpConnectionFactory`](crate::HttpConnectionFactory) share a single
/// `reqwest::Client` and its connection pool.
pub struct HttpConnection {
    host: Host,
    base_url: Url,
    client: Client,
    probe_timeout: Duration,
    health: HealthRecord,
}

impl HttpConnection {
    /// Creates a connection for `host`. Fails when the host does not form a
    /// valid URL.
    pub fn new(host: Host, client: Client) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&host.to_string())?;
        Ok(Self {
            host,
            base_url,
            client,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            health: HealthRecord::new(),
        })
    }

    /// Sets the bound on a single probe.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// The node's base URL, including any path prefix.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The shared HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The bound on a single probe.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// State, failures and last ping read together.
    pub fn health(&self) -> HealthSnapshot {
        self.health.snapshot()
    }

    /// Resolves `target` against this node.
    ///
    /// ```
    /// use nodepool_http::{Endpoint, HttpConnection};
    ///
    /// let host = "https://search-1:9243/es".parse().unwrap();
    /// let connection = HttpConnection::new(host, reqwest::Client::new()).unwrap();
    /// let target = Endpoint::lookup("indices.flush")
    ///     .unwrap()
    ///     .request()
    ///     .part("index", "logs")
    ///     .unwrap()
    ///     .param("force", true)
    ///     .unwrap()
    ///     .build();
    ///
    /// assert_eq!(
    ///     connection.url_for(&target).as_str(),
    ///     "https://search-1:9243/es/logs/_flush?force=true"
    /// );
    /// ```
    pub fn url_for(&self, target: &RequestTarget) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{}", self.host.path(), target.path()));
        if !target.query().is_empty() {
            url.query_pairs_mut().extend_pairs(target.query());
        }
        url
    }

    /// Starts a request for `target` on this node.
    pub fn request(&self, target: &RequestTarget) -> reqwest::RequestBuilder {
        self.client
            .request(target.method().clone(), self.url_for(target))
    }

    fn probe_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}/", self.host.path()));
        url
    }
}

impl Connection for HttpConnection {
    fn host(&self) -> &Host {
        &self.host
    }

    async fn ping(&self) -> bool {
        let response = self
            .client
            .head(self.probe_url())
            .timeout(self.probe_timeout)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => true,
            Ok(_response) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(host = %self.host, status = %_response.status(), "probe rejected");
                false
            }
            Err(_error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(host = %self.host, error = %_error, "probe failed");
                false
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    fn mark_alive(&self, at: Instant) {
        self.health.mark_alive(at)
    }

    fn mark_dead(&self, at: Instant) {
        self.health.mark_dead(at);
    }

    fn ping_failures(&self) -> u32 {
        self.health.ping_failures()
    }

    fn last_ping(&self) -> Option<Instant> {
        self.health.last_ping()
    }
}

impl fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConnection")
            .field("base_url", &self.base_url.as_str())
            .field("probe_timeout", &self.probe_timeout)
            .field("health", &self.health.snapshot())
            .finish()
    }
}
