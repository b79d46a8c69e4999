use crate::{Error, RouteError};
use futures::FutureExt;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;

type BoxedHandler<T, E> =
    Box<dyn Fn(Request<T>, Response<Full<Bytes>>) -> HandlerReturn<T, E> + Send + Sync + 'static>;
type HandlerReturn<T, E> = Box<dyn Future<Output = Result<Next<T>, E>> + Send + 'static>;

/// The control signal a handler returns to the dispatch chain.
///
/// Returning `Err(e)` from a handler has the same effect as returning `Next::Abort(e.into())`.
pub enum Next<T> {
    /// Pass the request and the response under construction to the next handler. When returned by
    /// the last handler of the chain, the response is sent as it is.
    Continue(Request<T>, Response<Full<Bytes>>),

    /// Stop the chain and send this response.
    Complete(Response<Full<Bytes>>),

    /// Stop the chain and let the error handler generate the response.
    Abort(RouteError),
}

impl<T> Next<T> {
    /// Aborts the chain with the given error.
    pub fn abort<R: Into<RouteError>>(err: R) -> Next<T> {
        Next::Abort(err.into())
    }
}

impl<T> Debug for Next<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Next::Continue(req, res) => write!(f, "Continue({} {}, {})", req.method(), req.uri(), res.status()),
            Next::Complete(res) => write!(f, "Complete({})", res.status()),
            Next::Abort(err) => write!(f, "Abort({})", err),
        }
    }
}

/// A boxed route handler or middleware.
///
/// Route handlers and middleware share one shape: an async function taking the request and the
/// response under construction and returning a [`Next`] signal. A `Handler` is created implicitly
/// by the [`RouterBuilder`](./struct.RouterBuilder.html) methods; construct one directly to register
/// a route with several handlers through [`RouterBuilder::add`](./struct.RouterBuilder.html#method.add).
///
/// # Examples
///
/// ```
/// use segroute::{Handler, Next, RouteMethod, Router};
/// use hyper::Method;
/// # use http_body_util::Full;
/// # use hyper::body::Bytes;
/// # use std::convert::Infallible;
///
/// # fn run() -> Router<Full<Bytes>, Infallible> {
/// let router = Router::builder()
///     .add(
///         RouteMethod::Only(Method::GET),
///         "/reports/:id",
///         vec![
///             Handler::new(|req, res| async move { Ok(Next::Continue(req, res)) }),
///             Handler::new(|_req, mut res| async move {
///                 *res.body_mut() = Full::from("report");
///                 Ok(Next::Complete(res))
///             }),
///         ],
///     )
///     .build()
///     .unwrap();
/// # router
/// # }
/// # run();
/// ```
pub struct Handler<T, E> {
    inner: BoxedHandler<T, E>,
}

impl<T: Send + 'static, E: Into<RouteError> + 'static> Handler<T, E> {
    /// Boxes an async function into a handler.
    pub fn new<H, R>(handler: H) -> Handler<T, E>
    where
        H: Fn(Request<T>, Response<Full<Bytes>>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Next<T>, E>> + Send + 'static,
    {
        let inner: BoxedHandler<T, E> =
            Box::new(move |req: Request<T>, res: Response<Full<Bytes>>| -> HandlerReturn<T, E> {
                Box::new(handler(req, res))
            });
        Handler { inner }
    }

    /// Calls the handler and awaits its result. Every failure, whether a panic during the call, a
    /// panic while polling, an `Err` output or an explicit abort, comes back as `Next::Abort`.
    pub(crate) async fn invoke(&self, req: Request<T>, res: Response<Full<Bytes>>) -> Next<T> {
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| (self.inner)(req, res))) {
            Ok(fut) => Pin::from(fut),
            Err(payload) => return Next::Abort(Error::from_panic(payload).into()),
        };

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(next)) => next,
            Ok(Err(err)) => Next::Abort(err.into()),
            Err(payload) => Next::Abort(Error::from_panic(payload).into()),
        }
    }
}

impl<T, E> Debug for Handler<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Handler")
    }
}
