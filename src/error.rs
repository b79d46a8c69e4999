use hyper::Method;
use std::any::Any;

/// The error type used by the `segroute` library.
///
/// Handlers may use it as their own error type (see [`Error::new`]). The library raises the other
/// variants itself: [`Error::AmbiguousRoute`] when the route table is misconfigured,
/// [`Error::HandlerPanicked`] when a handler panics and [`Error::Bind`] when a listener can not be
/// started.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A plain message error.
    #[error("{0}")]
    Message(String),

    /// More than one route matches a request. This is a configuration defect of the router, it is
    /// never passed to the error handler.
    #[error("{count} routes match {method} {path}, route patterns must not overlap")]
    AmbiguousRoute { method: Method, path: String, count: usize },

    /// A handler or a middleware panicked while being called or polled.
    #[error("handler panicked: {0}")]
    HandlerPanicked(String),

    /// The listener could not be bound.
    #[error("could not listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new error instance with the specified message.
    pub fn new<M: Into<String>>(msg: M) -> Self {
        Error::Message(msg.into())
    }

    /// Returns `true` if this error reports overlapping routes.
    pub fn is_ambiguous_route(&self) -> bool {
        matches!(self, Error::AmbiguousRoute { .. })
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let msg = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_owned()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Error::HandlerPanicked(msg)
    }
}

/// The boxed error every handler error is converted into before it reaches the error handler.
///
/// The original error can be recovered with `downcast_ref`.
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;
