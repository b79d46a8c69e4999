//! `segroute` provides a segment-matching router with ordered middleware chains for the Rust HTTP
//! library [hyper](https://hyper.rs/).
//!
//! Its core features:
//!
//! - Route patterns compiled once into typed segments: static text, `:param`, optional `:param?`
//!   and the trailing wildcard `*`
//!
//! - Overlapping routes detected at dispatch time instead of silently shadowing each other
//!
//! - Global and path-scoped middleware sharing one handler shape with the route handlers
//!
//! - One error funnel: handler errors, explicit aborts and panics all reach a single error handler
//!
//! ## Basic Example
//!
//! A simple example using `segroute` with `hyper` would look like the following:
//!
//! ```no_run
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::{Response, StatusCode};
//! // Import the prelude traits.
//! use segroute::prelude::*;
//! use segroute::{Middleware, Next, RequestInfo, RouteError, Router, RouterService};
//! use std::convert::Infallible;
//!
//! // Define an error handler function which will accept the error and the request information
//! // and generates an appropriate response.
//! async fn error_handler(err: RouteError, info: RequestInfo) -> Response<Full<Bytes>> {
//!     eprintln!("{} {}: {}", info.method(), info.uri(), err);
//!     let mut res = Response::new(Full::from(format!("Something went wrong: {}", err)));
//!     *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
//!     res
//! }
//!
//! // Create a `Router<Incoming, Infallible>` for request body type `hyper::body::Incoming`
//! // and for handler error type `Infallible`.
//! fn router() -> Router<Incoming, Infallible> {
//!     Router::builder()
//!         // A middleware which logs an http request.
//!         .middleware(Middleware::new(|req, res| async move {
//!             println!("{:?} {} {}", req.remote_addr(), req.method(), req.path());
//!             Ok(Next::Continue(req, res))
//!         }))
//!         .get("/", |_req, mut res| async move {
//!             *res.body_mut() = Full::from("Home page");
//!             Ok(Next::Complete(res))
//!         })
//!         .get("/users/:userId", |req, mut res| async move {
//!             let user_id = req.param("userId").cloned().unwrap_or_default();
//!             *res.body_mut() = Full::from(format!("Hello {}", user_id));
//!             Ok(Next::Complete(res))
//!         })
//!         .err_handler_with_info(error_handler)
//!         .build()
//!         .unwrap()
//! }
//!
//! #[tokio::main]
//! async fn main() -> segroute::Result<()> {
//!     let listening = RouterService::new(router()).listen(3001, "127.0.0.1").await?;
//!     println!("App is running on: {}", listening.local_addr());
//!
//!     tokio::signal::ctrl_c().await?;
//!     listening.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler is an async function which takes the request and the response under construction
//! and returns a [`Next`] signal wrapped in a `Result`:
//!
//! - `Next::Continue(req, res)` passes both on to the next handler. When the last handler
//!   continues, the response is sent as it is.
//! - `Next::Complete(res)` stops the chain and sends `res`.
//! - `Next::Abort(err)` stops the chain and lets the error handler build the response.
//!   Returning `Err(err)` does the same.
//!
//! ```
//! use http_body_util::Full;
//! use hyper::body::Bytes;
//! use segroute::{Next, Router};
//! # use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .get("/about", |_req, mut res| async move {
//!         *res.body_mut() = Full::from("About page");
//!         Ok(Next::Complete(res))
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! A route may run several handlers in order, see [`RouterBuilder::add`] and [`Handler`].
//!
//! ### Route Paths
//!
//! Route paths are split on `/` into segments. Leading and trailing slashes are ignored, so
//! `/about`, `about/` and `/about/` are the same path. Every segment is one of:
//!
//! - static text, matched exactly: `/about`
//! - a parameter, matching any non-empty piece: `/users/:id`
//! - an optional parameter, which may be missing at the end of the path: `/users/:id?` matches
//!   both `/users` and `/users/42`
//! - the wildcard `*`, matching one or more remaining pieces: `/files/*` matches `/files/a/b.txt`
//!
//! ```
//! use http_body_util::Full;
//! use hyper::body::Bytes;
//! use segroute::{Next, Router};
//! # use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .get("/files/*", |_req, mut res| async move {
//!         *res.body_mut() = Full::from("It will match /files/a, /files/a/b");
//!         Ok(Next::Complete(res))
//!     })
//!     .any_method("/health", |_req, mut res| async move {
//!         *res.body_mut() = Full::from("ok");
//!         Ok(Next::Complete(res))
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! Exactly one route may match a request. When two routes match the same request the dispatch
//! fails with [`Error::AmbiguousRoute`], so overlapping patterns are caught early rather than
//! depending on registration order. A request matching no route gets a `404 Not Found` response.
//!
//! ### Route Parameters
//!
//! Parameter values are percent-decoded and available through [`RequestExt`](./ext/trait.RequestExt.html):
//!
//! ```
//! use http_body_util::Full;
//! use hyper::body::Bytes;
//! use segroute::prelude::*;
//! use segroute::{Next, Router};
//! # use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .get("/users/:userName/books/:bookName?", |req, mut res| async move {
//!         let user_name = req.param("userName").cloned().unwrap_or_default();
//!         let book_name = req.param("bookName").cloned().unwrap_or_else(|| "all".to_owned());
//!         let page = req.query_param("page").cloned().unwrap_or_default();
//!
//!         *res.body_mut() = Full::from(format!("{} {} {}", user_name, book_name, page));
//!         Ok(Next::Complete(res))
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Middleware
//!
//! A [`Middleware`] has the same shape as a route handler and runs before the route handlers of a
//! matched request. Global middleware run first, then the middleware scoped to a path prefix of
//! the request, each group in registration order. Middleware never run for unmatched requests.
//!
//! ```
//! use http_body_util::Full;
//! use hyper::body::Bytes;
//! use hyper::StatusCode;
//! use segroute::{Middleware, Next, Router};
//! # use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .middleware(Middleware::with_path("/admin", |req, mut res| async move {
//!         if req.headers().contains_key("authorization") {
//!             return Ok(Next::Continue(req, res));
//!         }
//!         *res.status_mut() = StatusCode::UNAUTHORIZED;
//!         Ok(Next::Complete(res))
//!     }))
//!     .get("/admin/stats", |_req, mut res| async move {
//!         *res.body_mut() = Full::from("stats");
//!         Ok(Next::Complete(res))
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Error Handling
//!
//! Any error returned by a handler, any [`Next::Abort`] and any panic raised while calling or
//! polling a handler is converted into a [`RouteError`] and passed to the error handler. The
//! default one responds with status `500` and the error message as the body.
//!
//! ```
//! use http_body_util::Full;
//! use hyper::body::Bytes;
//! use hyper::{Response, StatusCode};
//! use segroute::{Error, Next, Router};
//!
//! # fn run() -> Router<Full<Bytes>, Error> {
//! let router = Router::builder()
//!     .get("/users/:id", |_req, _res| async move { Err(Error::new("user store is offline")) })
//!     .err_handler(|err| async move {
//!         let mut res = Response::new(Full::from(format!("Something went wrong: {}", err)));
//!         *res.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
//!         res
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ### Error Handling with Request Info
//!
//! [`err_handler_with_info`](./struct.RouterBuilder.html#method.err_handler_with_info) also passes
//! a [`RequestInfo`] with the method, uri, headers and route parameters of the failed request.

pub use self::error::{Error, RouteError};
pub use self::handler::{Handler, Next};
pub use self::middleware::Middleware;
pub use self::route::{Route, RouteMethod};
pub use self::router::{RouteMatch, Router, RouterBuilder};
#[doc(hidden)]
pub use self::service::RequestService;
pub use self::service::{Listening, RequestServiceBuilder, RouterService};
pub use self::types::{QueryParams, RequestInfo, RequestTarget, RouteParams};

mod error;
pub mod ext;
mod handler;
mod helpers;
mod middleware;
pub mod pattern;
pub mod prelude;
mod route;
mod router;
mod service;
mod types;

/// A Result type often returned from methods that can have `segroute` errors.
pub type Result<T> = std::result::Result<T, RouteError>;
