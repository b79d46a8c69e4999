use crate::handler::{Handler, Next};
use crate::middleware::Middleware;
use crate::route::{Route, RouteMethod};
use crate::router::{ErrHandler, RouteTable, Router};
use crate::types::RequestInfo;
use crate::{Error, RouteError};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

/// Builder for the [Router](./struct.Router.html) type.
///
/// This `RouterBuilder<T, E>` type accepts two type parameters: `T` and `E`.
///
/// * The `T` represents the request body type.
/// * The `E` represents the error type shared by the route handlers and the middleware.
///
/// Registration errors are deferred: the first one is returned by [`build`](#method.build).
///
/// # Examples
///
/// ```
/// use segroute::{Middleware, Next, Router};
/// use http_body_util::Full;
/// use hyper::body::Bytes;
/// use std::convert::Infallible;
///
/// fn run() -> Router<Full<Bytes>, Infallible> {
///     Router::builder()
///         .middleware(Middleware::new(|req, res| async move { Ok(Next::Continue(req, res)) }))
///         .get("/", |_req, mut res| async move {
///             *res.body_mut() = Full::from("home");
///             Ok(Next::Complete(res))
///         })
///         .route("delete", "/users/:id", |req, res| async move { Ok(Next::Continue(req, res)) })
///         .any_method("/health", |_req, mut res| async move {
///             *res.body_mut() = Full::from("ok");
///             Ok(Next::Complete(res))
///         })
///         .build()
///         .unwrap()
/// }
/// # run();
/// ```
pub struct RouterBuilder<T, E> {
    inner: crate::Result<BuilderInner<T, E>>,
}

struct BuilderInner<T, E> {
    routes: Vec<(RouteMethod, Route<T, E>)>,
    middlewares: Vec<Middleware<T, E>>,
    err_handler: Option<ErrHandler>,
}

macro_rules! define_method {
    ($(#[$doc:meta])* $name:ident, $method:ident) => {
        $(#[$doc])*
        pub fn $name<P, H, R>(self, path: P, handler: H) -> Self
        where
            P: Into<String>,
            H: Fn(Request<T>, Response<Full<Bytes>>) -> R + Send + Sync + 'static,
            R: Future<Output = Result<Next<T>, E>> + Send + 'static,
        {
            self.add(RouteMethod::Only(Method::$method), path, vec![Handler::new(handler)])
        }
    };
}

impl<T: Send + 'static, E: Into<RouteError> + 'static> RouterBuilder<T, E> {
    /// Creates a new `RouterBuilder` instance with default options.
    pub fn new() -> RouterBuilder<T, E> {
        RouterBuilder::default()
    }

    /// Creates a new [Router](./struct.Router.html) instance from the added configuration.
    ///
    /// # Errors
    ///
    /// Fails if a route was registered with an invalid method name or without any handler.
    pub fn build(self) -> crate::Result<Router<T, E>> {
        self.inner.map(|inner| {
            let mut table = RouteTable::new();
            for (method, route) in inner.routes {
                table.register(method, route);
            }

            let (middlewares, scoped_middlewares) = inner.middlewares.into_iter().partition(Middleware::is_global);

            Router {
                table,
                middlewares,
                scoped_middlewares,
                err_handler: inner.err_handler.unwrap_or_default(),
            }
        })
    }

    fn and_then<F>(self, func: F) -> Self
    where
        F: FnOnce(BuilderInner<T, E>) -> crate::Result<BuilderInner<T, E>>,
    {
        RouterBuilder {
            inner: self.inner.and_then(func),
        }
    }

    define_method!(
        /// Adds a new route with `GET` method and the handler at the specified path.
        get,
        GET
    );
    define_method!(
        /// Adds a new route with `POST` method and the handler at the specified path.
        post,
        POST
    );
    define_method!(
        /// Adds a new route with `PUT` method and the handler at the specified path.
        put,
        PUT
    );
    define_method!(
        /// Adds a new route with `DELETE` method and the handler at the specified path.
        delete,
        DELETE
    );
    define_method!(
        /// Adds a new route with `PATCH` method and the handler at the specified path.
        patch,
        PATCH
    );
    define_method!(
        /// Adds a new route with `HEAD` method and the handler at the specified path.
        head,
        HEAD
    );
    define_method!(
        /// Adds a new route with `OPTIONS` method and the handler at the specified path.
        options,
        OPTIONS
    );
    define_method!(
        /// Adds a new route with `TRACE` method and the handler at the specified path.
        trace,
        TRACE
    );
    define_method!(
        /// Adds a new route with `CONNECT` method and the handler at the specified path.
        connect,
        CONNECT
    );

    /// Adds a new route which matches every request method. It is consulted after the routes
    /// registered for the request's own method.
    pub fn any_method<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Fn(Request<T>, Response<Full<Bytes>>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Next<T>, E>> + Send + 'static,
    {
        self.add(RouteMethod::Any, path, vec![Handler::new(handler)])
    }

    /// Adds a new route for a method given by name. `*` registers the route for every method.
    pub fn route<M, P, H, R>(self, method: M, path: P, handler: H) -> Self
    where
        M: AsRef<str>,
        P: Into<String>,
        H: Fn(Request<T>, Response<Full<Bytes>>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Next<T>, E>> + Send + 'static,
    {
        match method.as_ref().parse::<RouteMethod>() {
            Ok(method) => self.add(method, path, vec![Handler::new(handler)]),
            Err(err) => self.and_then(move |_| Err(err.into())),
        }
    }

    /// Adds a new route with an ordered list of handlers. The handlers run after the middleware,
    /// each one passing the request on with [`Next::Continue`].
    pub fn add<P>(self, method: RouteMethod, path: P, handlers: Vec<Handler<T, E>>) -> Self
    where
        P: Into<String>,
    {
        self.and_then(move |mut inner| {
            let path = path.into();
            if handlers.is_empty() {
                return Err(Error::new(format!("The route {:?} has no handler", path)).into());
            }

            inner.routes.push((method, Route::new(path, handlers)));
            Ok(inner)
        })
    }

    /// Adds a middleware. Please refer to the [Middleware](./index.html#middleware) section for more info.
    pub fn middleware(self, middleware: Middleware<T, E>) -> Self {
        self.and_then(move |mut inner| {
            inner.middlewares.push(middleware);
            Ok(inner)
        })
    }

    /// Adds a handler to handle any error raised by the route handlers or the middleware.
    ///
    /// The default error handler responds with status 500 and the error message as the body.
    pub fn err_handler<H, R>(self, handler: H) -> Self
    where
        H: Fn(RouteError) -> R + Send + Sync + 'static,
        R: Future<Output = Response<Full<Bytes>>> + Send + 'static,
    {
        self.and_then(move |mut inner| {
            inner.err_handler = Some(ErrHandler::without_info(handler));
            Ok(inner)
        })
    }

    /// Adds a handler to handle any error raised by the route handlers or the middleware. It also
    /// receives the [request info](./struct.RequestInfo.html) e.g. headers, method, uri etc.
    pub fn err_handler_with_info<H, R>(self, handler: H) -> Self
    where
        H: Fn(RouteError, RequestInfo) -> R + Send + Sync + 'static,
        R: Future<Output = Response<Full<Bytes>>> + Send + 'static,
    {
        self.and_then(move |mut inner| {
            inner.err_handler = Some(ErrHandler::with_info(handler));
            Ok(inner)
        })
    }
}

impl<T, E> Default for RouterBuilder<T, E> {
    fn default() -> RouterBuilder<T, E> {
        RouterBuilder {
            inner: Ok(BuilderInner {
                routes: Vec::new(),
                middlewares: Vec::new(),
                err_handler: None,
            }),
        }
    }
}

impl<T, E> Debug for RouterBuilder<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inner {
            Ok(ref inner) => write!(
                f,
                "{{ routes: {:?}, middlewares: {:?} }}",
                inner.routes, inner.middlewares
            ),
            Err(ref err) => write!(f, "{{ error: {} }}", err),
        }
    }
}
