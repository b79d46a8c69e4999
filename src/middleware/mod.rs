use crate::handler::{Handler, Next};
use crate::pattern::{self, Segment, SEPARATOR};
use crate::RouteError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::borrow::Cow;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

/// A middleware runs before the route handlers. Please refer to the [Middleware](./index.html#middleware)
/// section for more info.
///
/// A middleware is either global, running for every matched request, or scoped to a path, running
/// only for matched requests whose path starts with that path. Global middleware run first, then
/// the scoped ones, each group in registration order.
///
/// This `Middleware<T, E>` type accepts two type parameters: `T` and `E`.
///
/// * The `T` represents the request body type.
/// * The `E` represents the error type shared by the route handlers and the middleware.
pub struct Middleware<T, E> {
    pub(crate) path: Option<String>,
    pub(crate) scope: Vec<Segment>,
    pub(crate) handler: Handler<T, E>,
}

impl<T: Send + 'static, E: Into<RouteError> + 'static> Middleware<T, E> {
    /// Creates a global middleware.
    ///
    /// # Examples
    ///
    /// ```
    /// use segroute::{Middleware, Next, Router};
    /// # use http_body_util::Full;
    /// # use hyper::body::Bytes;
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Full<Bytes>, Infallible> {
    ///     let router = Router::builder()
    ///         .middleware(Middleware::new(|req, res| async move {
    ///             /* Do some operations */
    ///             Ok(Next::Continue(req, res))
    ///         }))
    ///         .build()
    ///         .unwrap();
    ///     router
    /// }
    /// # run();
    /// ```
    pub fn new<H, R>(handler: H) -> Middleware<T, E>
    where
        H: Fn(Request<T>, Response<Full<Bytes>>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Next<T>, E>> + Send + 'static,
    {
        Middleware {
            path: None,
            scope: Vec::new(),
            handler: Handler::new(handler),
        }
    }

    /// Creates a middleware scoped to the specified path. The path is compiled like a route
    /// pattern, so it may contain parameters. The root path `/` creates a global middleware.
    ///
    /// # Examples
    ///
    /// ```
    /// use segroute::{Middleware, Next, Router};
    /// # use http_body_util::Full;
    /// # use hyper::body::Bytes;
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Full<Bytes>, Infallible> {
    ///     let router = Router::builder()
    ///         .middleware(Middleware::with_path("/admin", |req, res| async move {
    ///             /* Runs for /admin and everything below it */
    ///             Ok(Next::Continue(req, res))
    ///         }))
    ///         .build()
    ///         .unwrap();
    ///     router
    /// }
    /// # run();
    /// ```
    pub fn with_path<P, H, R>(path: P, handler: H) -> Middleware<T, E>
    where
        P: Into<String>,
        H: Fn(Request<T>, Response<Full<Bytes>>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Next<T>, E>> + Send + 'static,
    {
        let path = path.into();
        if pattern::clean(&path) == SEPARATOR {
            return Middleware::new(handler);
        }

        Middleware {
            scope: pattern::compile(&path),
            path: Some(path),
            handler: Handler::new(handler),
        }
    }
}

impl<T, E> Middleware<T, E> {
    /// The scope path, `None` for a global middleware.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub(crate) fn is_global(&self) -> bool {
        self.path.is_none()
    }

    /// Segment-wise prefix test of the scope against the decoded pieces of a request path.
    pub(crate) fn applies_to(&self, pieces: &[Cow<'_, str>]) -> bool {
        self.is_global()
            || (pieces.len() >= self.scope.len() && self.scope.iter().zip(pieces).all(|(seg, piece)| seg.accepts(piece)))
    }
}

impl<T, E> Debug for Middleware<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ path: {:?}, scope: {:?} }}", self.path, self.scope)
    }
}
