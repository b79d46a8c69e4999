//! Extensions to the hyper [`Request`](https://docs.rs/hyper/latest/hyper/struct.Request.html) type.

use crate::types::{QueryParams, RequestMeta, RequestTarget, RouteParams};
use hyper::Request;
use std::net::SocketAddr;

lazy_static::lazy_static! {
    static ref EMPTY_ROUTE_PARAMS: RouteParams = RouteParams::new();
    static ref EMPTY_QUERY_PARAMS: QueryParams = QueryParams::new();
}

/// A extension trait which extends the [`hyper::Request`](https://docs.rs/hyper/latest/hyper/struct.Request.html)
/// type with some helpful methods.
///
/// The values are attached by the router while it dispatches the request. Outside of a dispatch
/// the methods fall back to empty values.
pub trait RequestExt {
    /// It returns the route parameters as [RouteParams](../struct.RouteParams.html) type with the
    /// name of the parameter specified in the path as their respective keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use segroute::prelude::*;
    /// use segroute::{Next, Router};
    /// # use http_body_util::Full;
    /// # use hyper::body::Bytes;
    /// # use std::convert::Infallible;
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
    fn params(&self) -> &RouteParams;

    /// It returns the route parameter value by the name of the parameter specified in the path.
    ///
    /// # Examples
    ///
    /// ```
    /// use segroute::prelude::*;
    /// use segroute::{Next, Router};
    /// # use http_body_util::Full;
    /// # use hyper::body::Bytes;
    /// # use std::convert::Infallible;
    ///
    /// # fn run() -> Router<Full<Bytes>, Infallible> {
    /// let router = Router::builder()
    ///     .get("/users/:userName", |req, mut res| async move {
    ///         let user_name = req.param("userName").cloned().unwrap_or_default();
    ///
    ///         *res.body_mut() = Full::from(format!("Username: {}", user_name));
    ///         Ok(Next::Complete(res))
    ///     })
    ///     .build()
    ///     .unwrap();
    /// # router
    /// # }
    /// # run();
    /// ```
    fn param<P: AsRef<str>>(&self, param_name: P) -> Option<&String>;

    /// It returns the remote address of the incoming request, if the request came through a
    /// [`RequestService`](../struct.RequestService.html).
    fn remote_addr(&self) -> Option<SocketAddr>;

    /// The request path the route was matched against.
    fn path(&self) -> &str;

    /// The parsed query string.
    fn query(&self) -> &QueryParams;

    /// A single query string value.
    fn query_param<P: AsRef<str>>(&self, name: P) -> Option<&String>;

    /// The raw query string including its leading `?`, or an empty string.
    fn search(&self) -> &str;
}

fn meta<T>(req: &Request<T>) -> Option<&RequestMeta> {
    req.extensions().get::<RequestMeta>()
}

fn target<T>(req: &Request<T>) -> Option<&RequestTarget> {
    meta(req).and_then(RequestMeta::target)
}

impl<T> RequestExt for Request<T> {
    fn params(&self) -> &RouteParams {
        meta(self)
            .and_then(RequestMeta::route_params)
            .unwrap_or(&*EMPTY_ROUTE_PARAMS)
    }

    fn param<P: AsRef<str>>(&self, param_name: P) -> Option<&String> {
        self.params().get(param_name)
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        meta(self).and_then(RequestMeta::remote_addr)
    }

    fn path(&self) -> &str {
        match target(self) {
            Some(target) => target.path(),
            None => self.uri().path(),
        }
    }

    fn query(&self) -> &QueryParams {
        target(self).map(RequestTarget::query).unwrap_or(&*EMPTY_QUERY_PARAMS)
    }

    fn query_param<P: AsRef<str>>(&self, name: P) -> Option<&String> {
        self.query().get(name.as_ref())
    }

    fn search(&self) -> &str {
        target(self).map(RequestTarget::search).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers;

    fn request(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    #[test]
    fn falls_back_outside_a_dispatch() {
        let req = request("/users/1?page=2");
        assert!(req.params().is_empty());
        assert_eq!(req.param("id"), None);
        assert_eq!(req.remote_addr(), None);
        assert_eq!(req.path(), "/users/1");
        assert!(req.query().is_empty());
        assert_eq!(req.search(), "");
    }

    #[test]
    fn reads_the_attached_meta() {
        let mut req = request("/users/1?page=2&sort=name");
        let target = RequestTarget::from_uri(req.uri());
        helpers::update_req_meta_in_extensions(req.extensions_mut(), RequestMeta::with_target(target));

        let mut params = RouteParams::new();
        params.set("id", "1");
        helpers::update_req_meta_in_extensions(req.extensions_mut(), RequestMeta::with_route_params(params));

        let addr: SocketAddr = "10.0.0.1:4000".parse().unwrap();
        helpers::update_req_meta_in_extensions(req.extensions_mut(), RequestMeta::with_remote_addr(addr));

        assert_eq!(req.param("id").map(String::as_str), Some("1"));
        assert_eq!(req.remote_addr(), Some(addr));
        assert_eq!(req.path(), "/users/1");
        assert_eq!(req.query_param("sort").map(String::as_str), Some("name"));
        assert_eq!(req.search(), "?page=2&sort=name");
    }
}
