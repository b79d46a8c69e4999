use crate::helpers;
use hyper::{HeaderMap, Method, Request, Uri, Version};
use std::collections::hash_map::Iter;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Parsed query string pairs. When a name repeats, the last value wins.
pub type QueryParams = HashMap<String, String>;

/// Represents a map of the route parameters using the name of the parameter specified in the path
/// as their respective keys.
///
/// Please refer to the [Route Parameters](./index.html#route-parameters) section for more info.
///
/// **Note:** This type shouldn't be created directly. It will be populated into the `req` object of
/// the route handler and can be accessed as `req.params()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    /// Creates an empty route parameters map.
    pub fn new() -> RouteParams {
        RouteParams(HashMap::new())
    }

    /// Creates an empty route parameters map with the specified capacity.
    pub fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams(HashMap::with_capacity(capacity))
    }

    /// Sets a new parameter entry with the specified key and the value.
    pub fn set<N: Into<String>, V: Into<String>>(&mut self, param_name: N, param_val: V) {
        self.0.insert(param_name.into(), param_val.into());
    }

    /// Returns the route parameter value mapped with the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use segroute::prelude::*;
    /// use segroute::{Next, Router};
    /// # use std::convert::Infallible;
    /// # use http_body_util::Full;
    /// # use hyper::body::Bytes;
    ///
    /// # fn run() -> Router<Full<Bytes>, Infallible> {
    /// let router = Router::builder()
    ///     .get("/users/:userName/books/:bookName", |req, mut res| async move {
    ///         let params = req.params();
    ///         let user_name = params.get("userName").cloned().unwrap_or_default();
    ///         let book_name = params.get("bookName").cloned().unwrap_or_default();
    ///
    ///         *res.body_mut() = Full::from(format!("Username: {}, Book Name: {}", user_name, book_name));
    ///         Ok(Next::Complete(res))
    ///     })
    ///     .build()
    ///     .unwrap();
    /// # router
    /// # }
    /// # run();
    /// ```
    pub fn get<N: AsRef<str>>(&self, param_name: N) -> Option<&String> {
        self.0.get(param_name.as_ref())
    }

    /// Checks if a route parameter exists.
    pub fn has<N: AsRef<str>>(&self, param_name: N) -> bool {
        self.0.contains_key(param_name.as_ref())
    }

    /// Returns the length of the route parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no parameter was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an [`Iterator`] over the parameter names.
    pub fn params_names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Returns an [`Iterator`] over the parameter entries as `(parameter_name: &String, parameter_value: &String)`.
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }

    /// Extends the current parameters map with other one.
    pub fn extend(&mut self, other_route_params: RouteParams) {
        other_route_params.0.into_iter().for_each(|(key, val)| {
            self.set(key, val);
        })
    }
}

/// The resolved target of a request: its path, its parsed query and its raw search string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTarget {
    path: String,
    query: QueryParams,
    search: String,
}

impl RequestTarget {
    /// Resolves the target of a request URI. The search string keeps its leading `?` and is empty
    /// when the URI has no query.
    pub fn from_uri(uri: &Uri) -> RequestTarget {
        let (query, search) = match uri.query() {
            Some(raw) => (helpers::parse_query(raw), format!("?{}", raw)),
            None => (QueryParams::new(), String::new()),
        };

        RequestTarget {
            path: uri.path().to_owned(),
            query,
            search,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn search(&self) -> &str {
        &self.search
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RequestMeta {
    remote_addr: Option<SocketAddr>,
    route_params: Option<RouteParams>,
    target: Option<RequestTarget>,
}

impl RequestMeta {
    pub(crate) fn with_remote_addr(remote_addr: SocketAddr) -> RequestMeta {
        RequestMeta {
            remote_addr: Some(remote_addr),
            ..Default::default()
        }
    }

    pub(crate) fn with_route_params(route_params: RouteParams) -> RequestMeta {
        RequestMeta {
            route_params: Some(route_params),
            ..Default::default()
        }
    }

    pub(crate) fn with_target(target: RequestTarget) -> RequestMeta {
        RequestMeta {
            target: Some(target),
            ..Default::default()
        }
    }

    pub(crate) fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub(crate) fn route_params(&self) -> Option<&RouteParams> {
        self.route_params.as_ref()
    }

    pub(crate) fn target(&self) -> Option<&RequestTarget> {
        self.target.as_ref()
    }

    pub(crate) fn extend(&mut self, other: RequestMeta) {
        if let Some(remote_addr) = other.remote_addr {
            self.remote_addr = Some(remote_addr);
        }

        if let Some(route_params) = other.route_params {
            match self.route_params {
                Some(ref mut existing) => existing.extend(route_params),
                None => self.route_params = Some(route_params),
            }
        }

        if let Some(target) = other.target {
            self.target = Some(target);
        }
    }
}

/// Represents some information for the incoming request.
///
/// It's used to access request information e.g. headers, method, uri etc for the error handler
/// registered with [`err_handler_with_info`](./struct.RouterBuilder.html#method.err_handler_with_info).
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    route_params: RouteParams,
    remote_addr: Option<SocketAddr>,
}

impl RequestInfo {
    pub(crate) fn new_from_req<T>(req: &Request<T>) -> Self {
        let meta = req.extensions().get::<RequestMeta>();

        RequestInfo {
            method: req.method().clone(),
            uri: req.uri().clone(),
            version: req.version(),
            headers: req.headers().clone(),
            route_params: meta.and_then(RequestMeta::route_params).cloned().unwrap_or_default(),
            remote_addr: meta.and_then(RequestMeta::remote_addr),
        }
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request method type.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request uri.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request's HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the route parameters captured for the request.
    pub fn params(&self) -> &RouteParams {
        &self.route_params
    }

    /// Returns the peer address, if the request came through a [`RequestService`](./struct.RequestService.html).
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}
