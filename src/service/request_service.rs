use crate::helpers;
use crate::router::Router;
use crate::types::RequestMeta;
use crate::RouteError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{service::Service, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// A per-connection [`Service`](https://docs.rs/hyper/latest/hyper/service/trait.Service.html)
/// which dispatches every request of the connection through the router.
///
/// It is created by a [`RequestServiceBuilder`](./struct.RequestServiceBuilder.html) for each peer.
pub struct RequestService<T, E> {
    pub(crate) router: Arc<Router<T, E>>,
    pub(crate) remote_addr: SocketAddr,
}

impl<T, E> Service<Request<T>> for RequestService<T, E>
where
    T: Send + 'static,
    E: Into<RouteError> + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = RouteError;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, mut req: Request<T>) -> Self::Future {
        let router = self.router.clone();
        let remote_addr = self.remote_addr;

        let fut = async move {
            helpers::update_req_meta_in_extensions(req.extensions_mut(), RequestMeta::with_remote_addr(remote_addr));
            router.dispatch(req).await
        };

        Box::pin(fut)
    }
}

/// Shares one router between the services of many connections.
#[derive(Debug)]
pub struct RequestServiceBuilder<T, E> {
    router: Arc<Router<T, E>>,
}

impl<T: Send + 'static, E: Into<RouteError> + 'static> RequestServiceBuilder<T, E> {
    pub fn new(router: Router<T, E>) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Creates the service for a connection from `remote_addr`.
    pub fn build(&self, remote_addr: SocketAddr) -> RequestService<T, E> {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::{Error, Next, RequestServiceBuilder, Router};
    use http::Method;
    use http_body_util::{BodyExt, Empty, Full};
    use hyper::service::Service;
    use hyper::{body::Bytes, Request, Response};
    use std::net::SocketAddr;
    use std::str::FromStr;

    #[tokio::test]
    async fn should_route_request() {
        const RESPONSE_TEXT: &str = "Hello world!";
        let remote_addr = SocketAddr::from_str("0.0.0.0:8080").unwrap();
        let router: Router<Empty<Bytes>, Error> = Router::builder()
            .get("/", |_req, mut res| async move {
                *res.body_mut() = Full::from(RESPONSE_TEXT);
                Ok(Next::Complete(res))
            })
            .build()
            .unwrap();
        let req: Request<Empty<Bytes>> = Request::builder()
            .method(Method::GET)
            .uri("/")
            .body(Empty::<Bytes>::new())
            .unwrap();

        let builder = RequestServiceBuilder::new(router);
        let service = builder.build(remote_addr);

        let resp: Response<Full<Bytes>> = service.call(req).await.unwrap();
        let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(RESPONSE_TEXT, body)
    }

    #[tokio::test]
    async fn should_attach_remote_addr() {
        let remote_addr = SocketAddr::from_str("192.168.1.20:5555").unwrap();
        let router: Router<Empty<Bytes>, Error> = Router::builder()
            .get("/whoami", |req, mut res| async move {
                let addr = req.remote_addr().map(|addr| addr.to_string()).unwrap_or_default();
                *res.body_mut() = Full::from(addr);
                Ok(Next::Complete(res))
            })
            .build()
            .unwrap();

        let service = RequestServiceBuilder::new(router).build(remote_addr);
        let req = Request::builder().uri("/whoami").body(Empty::<Bytes>::new()).unwrap();

        let resp = service.call(req).await.unwrap();
        let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body_bytes[..], b"192.168.1.20:5555");
    }
}
