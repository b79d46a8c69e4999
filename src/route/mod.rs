use crate::handler::Handler;
use crate::pattern::{self, Segment, SegmentKind};
use crate::types::RouteParams;
use crate::Error;
use hyper::Method;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::str::FromStr;

/// The method a route is registered for.
///
/// `RouteMethod::Any` is the wildcard method: routes registered with it are consulted for every
/// request method, after the routes registered for that specific method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// Matches any request method.
    Any,
    /// Matches a single request method.
    Only(Method),
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        RouteMethod::Only(method)
    }
}

impl FromStr for RouteMethod {
    type Err = Error;

    /// Parses `*` as the wildcard method and anything else as an HTTP method name. Names are
    /// upper-cased first, so `get` parses to `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(RouteMethod::Any);
        }

        Method::from_bytes(s.to_ascii_uppercase().as_bytes())
            .map(RouteMethod::Only)
            .map_err(|_| Error::new(format!("Invalid HTTP method name: {:?}", s)))
    }
}

/// Represents a single route.
///
/// A route consists of a compiled path pattern and an ordered list of handlers. It shouldn't be
/// created directly, use [RouterBuilder](./struct.RouterBuilder.html) methods to create a route.
///
/// This `Route<T, E>` type accepts two type parameters: `T` and `E`.
///
/// * The `T` represents the request body type.
/// * The `E` represents the error type shared by the route handlers and the middleware. It must be
///   convertible into a [`RouteError`](./type.RouteError.html).
pub struct Route<T, E> {
    pub(crate) path: String,
    pub(crate) segments: Vec<Segment>,
    pub(crate) handlers: Vec<Handler<T, E>>,
}

impl<T, E> Route<T, E> {
    pub(crate) fn new<P: Into<String>>(path: P, handlers: Vec<Handler<T, E>>) -> Route<T, E> {
        let path = path.into();
        let segments = pattern::compile(&path);

        Route {
            path,
            segments,
            handlers,
        }
    }

    /// The pattern this route was registered with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The compiled pattern.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Tests the route against the decoded pieces of a request path.
    pub(crate) fn is_match(&self, pieces: &[Cow<'_, str>]) -> bool {
        self.accepts_len(pieces.len()) && self.segments.iter().zip(pieces).all(|(seg, piece)| seg.accepts(piece))
    }

    // A trailing wildcard absorbs extra pieces, a trailing optional lets pieces run short.
    fn accepts_len(&self, piece_count: usize) -> bool {
        let last = self.segments.last().map(Segment::kind);
        match piece_count.cmp(&self.segments.len()) {
            Ordering::Equal => true,
            Ordering::Greater => last == Some(SegmentKind::Any),
            Ordering::Less => last == Some(SegmentKind::Optional),
        }
    }

    pub(crate) fn extract_params(&self, pieces: &[Cow<'_, str>]) -> RouteParams {
        let mut route_params = RouteParams::new();

        for (seg, piece) in self.segments.iter().zip(pieces) {
            if pattern::is_placeholder(piece) || !seg.captures() {
                continue;
            }
            route_params.set(seg.value(), piece.as_ref());
        }

        route_params
    }
}

impl<T, E> Debug for Route<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ path: {:?}, segments: {:?}, handlers: {} }}",
            self.path,
            self.segments,
            self.handlers.len()
        )
    }
}
