#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Response;
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use segroute::{Listening, RouteError, Router, RouterService};
use std::net::SocketAddr;

pub struct Serve {
    listening: Listening,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.listening.local_addr()
    }

    pub fn new_request(&self, method: &str, route: &str) -> http::request::Builder {
        http::request::Request::builder()
            .method(method.to_ascii_uppercase().as_str())
            .uri(format!("http://{}{}", self.addr(), route))
    }

    pub async fn send(&self, req: http::request::Builder) -> Response<Incoming> {
        let req = req.body(Full::new(Bytes::new())).unwrap();
        self.client.request(req).await.unwrap()
    }

    pub async fn shutdown(self) {
        self.listening.shutdown().await;
    }
}

pub async fn serve<E>(router: Router<Incoming, E>) -> Serve
where
    E: Into<RouteError> + 'static,
{
    // Port 0 binds to an available port.
    let listening = RouterService::new(router).listen(0, "127.0.0.1").await.unwrap();
    let client = Client::builder(TokioExecutor::new()).build_http();

    Serve { listening, client }
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}
