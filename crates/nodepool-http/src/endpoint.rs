//! Mapping logical operations to HTTP requests.
//!
//! Each route names an operation (`indices.flush`), its method, the path with
//! and without its optional path part, and the query parameters it accepts.
//! Building a request validates parameters against that allow-list.

use reqwest::Method;
use std::fmt;

/// Query parameters every endpoint accepts.
pub const COMMON_PARAMS: &[&str] = &["pretty", "human", "error_trace", "source", "filter_path"];

/// Errors raised while building a [`RequestTarget`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// No route is registered under this name.
    #[error("unknown endpoint `{0}`")]
    UnknownEndpoint(String),
    /// The endpoint has no path part with this name.
    #[error("endpoint `{endpoint}` has no path part `{part}`")]
    UnknownPathPart {
        /// The endpoint name.
        endpoint: &'static str,
        /// The rejected part.
        part: String,
    },
    /// The query parameter is not on the endpoint's allow-list.
    #[error("`{param}` is not a valid parameter for `{endpoint}`; allowed: {allowed}")]
    DisallowedParam {
        /// The endpoint name.
        endpoint: &'static str,
        /// The rejected parameter.
        param: String,
        /// Comma-separated allow-list, common parameters included.
        allowed: String,
    },
}

struct Route {
    name: &'static str,
    method: Method,
    /// Path without the optional part.
    path: &'static str,
    /// Name of the optional part and the path template it selects, e.g.
    /// `("index", "/{}/_flush")`.
    part: Option<(&'static str, &'static str)>,
    params: &'static [&'static str],
}

static ROUTES: &[Route] = &[
    Route {
        name: "cluster.stats",
        method: Method::GET,
        path: "/_cluster/stats",
        part: Some(("node_id", "/_cluster/stats/nodes/{}")),
        params: &["flat_settings", "timeout"],
    },
    Route {
        name: "indices.flush",
        method: Method::POST,
        path: "/_flush",
        part: Some(("index", "/{}/_flush")),
        params: &[
            "force",
            "wait_if_ongoing",
            "ignore_unavailable",
            "allow_no_indices",
            "expand_wildcards",
        ],
    },
    Route {
        name: "indices.get_template",
        method: Method::GET,
        path: "/_template",
        part: Some(("name", "/_template/{}")),
        params: &[
            "include_type_name",
            "flat_settings",
            "master_timeout",
            "local",
        ],
    },
    Route {
        name: "security.get_api_key",
        method: Method::GET,
        path: "/_security/api_key",
        part: None,
        params: &["id", "name", "username", "realm_name", "owner"],
    },
];

/// A registered operation.
#[derive(Clone, Copy)]
pub struct Endpoint {
    route: &'static Route,
}

impl Endpoint {
    /// Looks up an operation by name, e.g. `"indices.flush"`.
    pub fn lookup(name: &str) -> Result<Self, EndpointError> {
        ROUTES
            .iter()
            .find(|route| route.name == name)
            .map(|route| Endpoint { route })
            .ok_or_else(|| EndpointError::UnknownEndpoint(name.to_string()))
    }

    /// Names of every registered operation.
    pub fn names() -> impl Iterator<Item = &'static str> {
        ROUTES.iter().map(|route| route.name)
    }

    /// The operation name.
    pub fn name(&self) -> &'static str {
        self.route.name
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.route.method
    }

    /// Name of the optional path part, if the route has one.
    pub fn path_part(&self) -> Option<&'static str> {
        self.route.part.map(|(name, _)| name)
    }

    /// Whether `param` may appear in the query string.
    pub fn allows(&self, param: &str) -> bool {
        self.route.params.contains(&param) || COMMON_PARAMS.contains(&param)
    }

    /// Starts a request for this operation.
    pub fn request(self) -> TargetBuilder {
        TargetBuilder {
            endpoint: self,
            part: None,
            query: Vec::new(),
        }
    }

    fn allowed(&self) -> String {
        self.route
            .params
            .iter()
            .chain(COMMON_PARAMS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.route.name)
            .field("method", &self.route.method)
            .finish()
    }
}

/// Builder for a [`RequestTarget`].
#[derive(Debug)]
pub struct TargetBuilder {
    endpoint: Endpoint,
    part: Option<String>,
    query: Vec<(String, String)>,
}

impl TargetBuilder {
    /// Sets the endpoint's path part to a single value.
    pub fn part(self, name: &str, value: impl AsRef<str>) -> Result<Self, EndpointError> {
        self.part_list(name, [value])
    }

    /// Sets the endpoint's path part to a list of values, joined with `,`.
    ///
    /// An empty list leaves the part unset.
    pub fn part_list<I, S>(mut self, name: &str, values: I) -> Result<Self, EndpointError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.endpoint.path_part() != Some(name) {
            return Err(EndpointError::UnknownPathPart {
                endpoint: self.endpoint.name(),
                part: name.to_string(),
            });
        }
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.part = (!joined.is_empty()).then_some(joined);
        Ok(self)
    }

    /// Adds a query parameter.
    pub fn param(mut self, name: &str, value: impl fmt::Display) -> Result<Self, EndpointError> {
        if !self.endpoint.allows(name) {
            return Err(EndpointError::DisallowedParam {
                endpoint: self.endpoint.name(),
                param: name.to_string(),
                allowed: self.endpoint.allowed(),
            });
        }
        self.query.push((name.to_string(), value.to_string()));
        Ok(self)
    }

    /// Finishes the target.
    pub fn build(self) -> RequestTarget {
        let route = self.endpoint.route;
        let path = match (&self.part, route.part) {
            (Some(value), Some((_, template))) => template.replacen("{}", value, 1),
            _ => route.path.to_string(),
        };
        RequestTarget {
            method: route.method.clone(),
            path,
            query: self.query,
        }
    }
}

/// A method, node-relative path and query, ready to be resolved against a
/// node with [`HttpConnection::url_for`](crate::HttpConnection::url_for).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
}

impl RequestTarget {
    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path, starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}
