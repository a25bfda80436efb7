//! Host descriptors for backend nodes.

use std::fmt;
use std::str::FromStr;

/// Port used when a descriptor does not name one.
pub const DEFAULT_PORT: u16 = 9200;

/// URL scheme of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// Plain HTTP
    #[default]
    Http,
    /// HTTP over TLS
    Https,
}

impl Scheme {
    /// The scheme as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = HostParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(HostParseError::UnsupportedScheme(s.to_string())),
        }
    }
}

/// Errors produced while parsing a host descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostParseError {
    /// The descriptor was empty or whitespace.
    #[error("host descriptor is empty")]
    Empty,
    /// The scheme is neither `http` nor `https`.
    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),
    /// No host name before the port or path.
    #[error("host descriptor `{0}` has no host name")]
    MissingHost(String),
    /// The port is not a number in `1..=65535`.
    #[error("invalid port `{port}` in host descriptor `{input}`")]
    InvalidPort {
        /// The whole descriptor.
        input: String,
        /// The offending port text.
        port: String,
    },
    /// An IPv6 literal was opened with `[` but never closed.
    #[error("unterminated IPv6 literal in host descriptor `{0}`")]
    UnterminatedIpv6(String),
    /// Credentials embedded in the authority are not supported.
    #[error("host descriptor `{0}` carries user info; configure credentials on the transport instead")]
    UserInfo(String),
}

impl From<std::convert::Infallible> for HostParseError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// A backend node address: scheme, host, port and an optional path prefix.
///
/// Parses from `"host"`, `"host:port"` or `"scheme://host:port/prefix"`.
/// Missing parts default to `http` and port [`DEFAULT_PORT`].
///
/// ```
/// use nodepool::Host;
///
/// let host: Host = "https://search-1.internal:443/es".parse().unwrap();
/// assert_eq!(host.port(), 443);
/// assert_eq!(host.to_string(), "https://search-1.internal:443/es");
///
/// let bare: Host = "localhost".parse().unwrap();
/// assert_eq!(bare.to_string(), "http://localhost:9200");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Host {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl Host {
    /// Creates a descriptor with no path prefix.
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
            path: String::new(),
        }
    }

    /// Sets the path prefix, e.g. `/es` for a node behind a proxy.
    pub fn with_path(mut self, path: impl AsRef<str>) -> Self {
        self.path = normalize_path(path.as_ref());
        self
    }

    /// Parses every descriptor, failing on the first malformed one.
    pub fn parse_all<I, S>(descriptors: I) -> Result<Vec<Host>, HostParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        descriptors
            .into_iter()
            .map(|d| d.as_ref().parse())
            .collect()
    }

    /// The scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The host name or address. IPv6 literals keep their brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The path prefix, empty or starting with `/` and without a trailing `/`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

impl FromStr for Host {
    type Err = HostParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(HostParseError::Empty);
        }

        let (scheme, rest) = match input.split_once("://") {
            Some((scheme, rest)) => (scheme.parse()?, rest),
            None => (Scheme::Http, input),
        };

        let (authority, path) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };

        if authority.contains('@') {
            return Err(HostParseError::UserInfo(input.to_string()));
        }

        let (host, port) = split_authority(input, authority)?;

        Ok(Host {
            scheme,
            host,
            port: port.unwrap_or(DEFAULT_PORT),
            path: normalize_path(path),
        })
    }
}

impl TryFrom<String> for Host {
    type Error = HostParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for Host {
    type Error = HostParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Host> for String {
    fn from(host: Host) -> Self {
        host.to_string()
    }
}

fn split_authority(input: &str, authority: &str) -> Result<(String, Option<u16>), HostParseError> {
    if let Some(rest) = authority.strip_prefix('[') {
        let (addr, after) = rest
            .split_once(']')
            .ok_or_else(|| HostParseError::UnterminatedIpv6(input.to_string()))?;
        if addr.is_empty() {
            return Err(HostParseError::MissingHost(input.to_string()));
        }
        let port = match after {
            "" => None,
            other => {
                let port = other
                    .strip_prefix(':')
                    .ok_or_else(|| HostParseError::InvalidPort {
                        input: input.to_string(),
                        port: other.to_string(),
                    })?;
                Some(parse_port(input, port)?)
            }
        };
        return Ok((format!("[{}]", addr), port));
    }

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(parse_port(input, port)?)),
        None => (authority, None),
    };

    if host.is_empty() {
        return Err(HostParseError::MissingHost(input.to_string()));
    }

    Ok((host.to_string(), port))
}

fn parse_port(input: &str, port: &str) -> Result<u16, HostParseError> {
    match port.parse::<u16>() {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(HostParseError::InvalidPort {
            input: input.to_string(),
            port: port.to_string(),
        }),
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
