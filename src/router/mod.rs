use crate::handler::{Handler, Next};
use crate::helpers;
use crate::middleware::Middleware;
use crate::pattern::{self, DecodedPieces};
use crate::route::Route;
use crate::types::{RequestInfo, RequestMeta, RequestTarget, RouteParams};
use crate::{Error, RouteError};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use smallvec::SmallVec;
use std::fmt::{self, Debug, Formatter};

pub use self::builder::RouterBuilder;
pub(crate) use self::err_handler::ErrHandler;
pub(crate) use self::table::RouteTable;

mod builder;
mod err_handler;
mod table;

/// Represents a modular, lightweight router which matches request paths against compiled route
/// patterns and runs the matched route's handler chain.
///
/// This `Router<T, E>` type accepts two type parameters: `T` and `E`.
///
/// * The `T` represents the request body type, [hyper::body::Incoming](https://docs.rs/hyper/latest/hyper/body/struct.Incoming.html)
///   when the router is served by a [`RouterService`](./struct.RouterService.html).
/// * The `E` represents the error type shared by the route handlers and the middleware. It must be
///   convertible into a [`RouteError`](./type.RouteError.html).
///
/// A router is created once with a [`RouterBuilder`](./struct.RouterBuilder.html) and is immutable
/// afterwards.
///
/// # Examples
///
/// ```
/// use segroute::{Next, Router};
/// use http_body_util::Full;
/// use hyper::body::Bytes;
/// use std::convert::Infallible;
///
/// fn run() -> Router<Full<Bytes>, Infallible> {
///     let router = Router::builder()
///         .get("/", |_req, mut res| async move {
///             *res.body_mut() = Full::from("home");
///             Ok(Next::Complete(res))
///         })
///         .build()
///         .unwrap();
///     router
/// }
/// # run();
/// ```
pub struct Router<T, E> {
    pub(crate) table: RouteTable<T, E>,
    pub(crate) middlewares: Vec<Middleware<T, E>>,
    pub(crate) scoped_middlewares: Vec<Middleware<T, E>>,
    pub(crate) err_handler: ErrHandler,
}

/// The outcome of a successful route lookup: the single matching route and the parameters it
/// captured from the request path.
pub struct RouteMatch<'a, T, E> {
    route: &'a Route<T, E>,
    params: RouteParams,
}

impl<'a, T, E> RouteMatch<'a, T, E> {
    pub fn route(&self) -> &'a Route<T, E> {
        self.route
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn into_params(self) -> RouteParams {
        self.params
    }
}

impl<T: Send + 'static, E: Into<RouteError> + 'static> Router<T, E> {
    /// Return a [RouterBuilder](./struct.RouterBuilder.html) instance to build a `Router`.
    pub fn builder() -> RouterBuilder<T, E> {
        RouterBuilder::new()
    }

    /// Dispatches a request through the router and produces its response.
    ///
    /// The request target (path, query and search) and the captured route parameters are attached
    /// to the request before the first handler runs, see [`RequestExt`](./ext/trait.RequestExt.html).
    /// A request without a matching route gets a `404 Not Found` response; the error handler is
    /// not involved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousRoute`] when more than one route matches the request. Handler
    /// failures never surface here, they are turned into a response by the error handler.
    pub async fn dispatch(&self, mut req: Request<T>) -> crate::Result<Response<Full<Bytes>>> {
        let target = RequestTarget::from_uri(req.uri());
        let target_path = target.path().to_owned();
        helpers::update_req_meta_in_extensions(req.extensions_mut(), RequestMeta::with_target(target));

        self.process(&target_path, req).await
    }

    pub(crate) async fn process(&self, target_path: &str, mut req: Request<T>) -> crate::Result<Response<Full<Bytes>>> {
        let pieces = pattern::split_decoded(target_path);

        let matched = match self.find_in(req.method(), target_path, &pieces) {
            Ok(Some(matched)) => matched,
            Ok(None) => {
                tracing::debug!(method = %req.method(), path = target_path, "no route matched");
                return Ok(helpers::not_found_response());
            }
            Err(err) => {
                tracing::error!(error = %err, "ambiguous route table");
                return Err(err.into());
            }
        };

        let RouteMatch { route, params } = matched;
        tracing::debug!(method = %req.method(), path = target_path, route = %route.path, "route matched");

        helpers::update_req_meta_in_extensions(req.extensions_mut(), RequestMeta::with_route_params(params));

        let req_info = if self.err_handler.should_gen_req_info() {
            Some(RequestInfo::new_from_req(&req))
        } else {
            None
        };

        let res = Response::new(Full::default());

        let scoped: SmallVec<[&Middleware<T, E>; 4]> = self
            .scoped_middlewares
            .iter()
            .filter(|m| m.applies_to(&pieces))
            .collect();

        let next = match route.handlers.as_slice() {
            [handler] if self.middlewares.is_empty() && scoped.is_empty() => handler.invoke(req, res).await,
            _ => {
                let chain = self
                    .middlewares
                    .iter()
                    .chain(scoped.iter().copied())
                    .map(|m| &m.handler)
                    .chain(route.handlers.iter());
                run_chain(chain, req, res).await
            }
        };

        match next {
            Next::Continue(_, res) | Next::Complete(res) => Ok(res),
            Next::Abort(err) => {
                tracing::debug!(error = %err, path = target_path, "handler chain aborted");
                Ok(self.err_handler.execute(err, req_info).await)
            }
        }
    }
}

impl<T, E> Router<T, E> {
    /// Finds the single route registered for `method` whose pattern matches `path`, and extracts
    /// its parameters.
    ///
    /// Every candidate is tested, so overlapping routes are detected no matter their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousRoute`] when more than one route matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use segroute::{Next, Router};
    /// use hyper::Method;
    /// # use http_body_util::Full;
    /// # use hyper::body::Bytes;
    /// # use std::convert::Infallible;
    ///
    /// let router: Router<Full<Bytes>, Infallible> = Router::builder()
    ///     .get("/users/:id", |req, res| async move { Ok(Next::Continue(req, res)) })
    ///     .build()
    ///     .unwrap();
    ///
    /// let matched = router.find(&Method::GET, "/users/42").unwrap().unwrap();
    /// assert_eq!(matched.params().get("id").unwrap(), "42");
    ///
    /// assert!(router.find(&Method::GET, "/users/").unwrap().is_none());
    /// ```
    pub fn find(&self, method: &Method, path: &str) -> Result<Option<RouteMatch<'_, T, E>>, Error> {
        let pieces = pattern::split_decoded(path);
        self.find_in(method, path, &pieces)
    }

    fn find_in(&self, method: &Method, path: &str, pieces: &DecodedPieces<'_>) -> Result<Option<RouteMatch<'_, T, E>>, Error> {
        let mut candidates = self.table.lookup(method).filter(|route| route.is_match(pieces));

        let route = match candidates.next() {
            Some(route) => route,
            None => return Ok(None),
        };

        let others = candidates.count();
        if others > 0 {
            return Err(Error::AmbiguousRoute {
                method: method.clone(),
                path: path.to_owned(),
                count: others + 1,
            });
        }

        Ok(Some(RouteMatch {
            params: route.extract_params(pieces),
            route,
        }))
    }

    /// Returns the number of registered routes.
    pub fn routes_count(&self) -> usize {
        self.table.len()
    }
}

async fn run_chain<'a, T, E, I>(chain: I, req: Request<T>, res: Response<Full<Bytes>>) -> Next<T>
where
    T: Send + 'static,
    E: Into<RouteError> + 'static,
    I: Iterator<Item = &'a Handler<T, E>>,
{
    let mut next = Next::Continue(req, res);

    for handler in chain {
        next = match next {
            Next::Continue(req, res) => handler.invoke(req, res).await,
            done => return done,
        };
    }

    next
}

impl<T, E> Debug for RouteMatch<'_, T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ route: {:?}, params: {:?} }}", self.route, self.params)
    }
}

impl<T, E> Debug for Router<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let routes: Vec<_> = self.table.iter().collect();
        write!(
            f,
            "{{ Routes: {:?}, Middlewares: {:?}, Scoped Middlewares: {:?} }}",
            routes, self.middlewares, self.scoped_middlewares
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteMethod;
    use std::convert::Infallible;

    type TestRouter = Router<(), Infallible>;

    fn handler() -> Handler<(), Infallible> {
        Handler::new(|req, res| async move { Ok(Next::Continue(req, res)) })
    }

    fn router(routes: &[(&str, &str)]) -> TestRouter {
        routes
            .iter()
            .fold(Router::builder(), |builder, (method, path)| {
                builder.add(method.parse::<RouteMethod>().unwrap(), *path, vec![handler()])
            })
            .build()
            .unwrap()
    }

    #[test]
    fn finds_single_match_with_params() {
        let router = router(&[("GET", "/users"), ("GET", "/users/:id"), ("POST", "/users/:id")]);

        let matched = router.find(&Method::GET, "/users/42").unwrap().unwrap();
        assert_eq!(matched.route().path(), "/users/:id");
        assert_eq!(matched.params().get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn reports_no_match() {
        let router = router(&[("GET", "/users/:id")]);
        assert!(router.find(&Method::GET, "/users/").unwrap().is_none());
        assert!(router.find(&Method::DELETE, "/users/1").unwrap().is_none());
    }

    #[test]
    fn identical_routes_are_ambiguous() {
        let router = router(&[("GET", "/users/:id"), ("GET", "/users/:id")]);

        let err = router.find(&Method::GET, "/users/1").unwrap_err();
        assert!(err.is_ambiguous_route());
        match err {
            Error::AmbiguousRoute { count, path, .. } => {
                assert_eq!(count, 2);
                assert_eq!(path, "/users/1");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn overlap_with_wildcard_method_is_ambiguous() {
        let router = router(&[("GET", "/a/:x"), ("*", "/a/b")]);
        assert!(router.find(&Method::GET, "/a/b").unwrap_err().is_ambiguous_route());
        assert_eq!(router.find(&Method::POST, "/a/b").unwrap().unwrap().route().path(), "/a/b");
    }

    #[test]
    fn distinct_routes_are_not_ambiguous() {
        let router = router(&[("GET", "/users/:id"), ("GET", "/users/:id/books")]);
        assert_eq!(
            router.find(&Method::GET, "/users/1/books").unwrap().unwrap().route().path(),
            "/users/:id/books"
        );
    }

    #[test]
    fn matches_percent_encoded_static_segments() {
        let router = router(&[("GET", "/caf\u{e9}/:item")]);

        let matched = router.find(&Method::GET, "/caf%C3%A9/cr%C3%A8me").unwrap().unwrap();
        assert_eq!(matched.route().path(), "/caf\u{e9}/:item");
        assert_eq!(matched.params().get("item").map(String::as_str), Some("cr\u{e8}me"));
    }

    #[test]
    fn trailing_optional_matches_a_shorter_path() {
        let router = router(&[("GET", "/x/y/:z?")]);
        assert!(router.find(&Method::GET, "/x").unwrap().is_some());
        assert!(router.find(&Method::GET, "/x/y/1").unwrap().is_some());
    }

    #[test]
    fn wildcard_method_matches_every_method() {
        let router = router(&[("*", "/health")]);
        for method in [Method::GET, Method::POST, Method::DELETE] {
            assert!(router.find(&method, "/health").unwrap().is_some());
        }
        assert_eq!(router.routes_count(), 1);
    }
}
