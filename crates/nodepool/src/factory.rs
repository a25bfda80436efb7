//! Building connections from host descriptors.

use crate::Host;

/// Boxed error returned by a [`ConnectionFactory`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Creates one connection per host when a pool is built.
///
/// Closures taking `&Host` and returning a `Result` are factories:
///
/// ```
/// use nodepool::{ConnectionFactory, Host};
///
/// let factory = |host: &Host| -> Result<String, std::convert::Infallible> {
///     Ok(host.to_string())
/// };
/// let host: Host = "node-1:9201".parse().unwrap();
/// assert_eq!(factory.create(&host).unwrap(), "http://node-1:9201");
/// ```
pub trait ConnectionFactory<C>: Send + Sync {
    /// Builds a connection for `host`.
    fn create(&self, host: &Host) -> Result<C, BoxError>;
}

impl<C, E, F> ConnectionFactory<C> for F
where
    F: Fn(&Host) -> Result<C, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn create(&self, host: &Host) -> Result<C, BoxError> {
        self(host).map_err(Into::into)
    }
}
