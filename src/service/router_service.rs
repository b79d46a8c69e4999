use crate::router::Router;
use crate::service::request_service::{RequestService, RequestServiceBuilder};
use crate::{Error, RouteError};
use hyper::body::Incoming;
use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::convert::Infallible;
use std::future::{ready, Ready};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A [`Service`](https://docs.rs/hyper/latest/hyper/service/trait.Service.html) which creates a
/// [`RequestService`](./struct.RequestService.html) for every accepted connection.
///
/// This `RouterService<E>` type accepts one type parameter `E`, the error type used by the route
/// handlers and the middleware. The request body type is hyper's
/// [`Incoming`](https://docs.rs/hyper/latest/hyper/body/struct.Incoming.html).
///
/// # Examples
///
/// ```no_run
/// use segroute::{Next, Router, RouterService};
/// use http_body_util::Full;
/// use hyper::body::Incoming;
/// use std::convert::Infallible;
///
/// fn router() -> Router<Incoming, Infallible> {
///     Router::builder()
///         .get("/", |_req, mut res| async move {
///             *res.body_mut() = Full::from("Home page");
///             Ok(Next::Complete(res))
///         })
///         .build()
///         .unwrap()
/// }
///
/// #[tokio::main]
/// async fn main() -> segroute::Result<()> {
///     let service = RouterService::new(router());
///
///     let listening = service.listen(3001, "127.0.0.1").await?;
///     println!("App is running on: {}", listening.local_addr());
///
///     tokio::signal::ctrl_c().await?;
///     listening.shutdown().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RouterService<E> {
    builder: RequestServiceBuilder<Incoming, E>,
}

impl<E: Into<RouteError> + 'static> RouterService<E> {
    /// Creates a new service with the provided router.
    pub fn new(router: Router<Incoming, E>) -> RouterService<E> {
        RouterService {
            builder: RequestServiceBuilder::new(router),
        }
    }

    /// Binds a TCP listener on `host:port` and serves every accepted connection in its own task,
    /// over HTTP/1 or HTTP/2 as negotiated by the client. Port `0` picks a free port, see
    /// [`Listening::local_addr`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] when the address can not be bound.
    pub async fn listen(self, port: u16, host: &str) -> crate::Result<Listening> {
        let addr = format!("{}:{}", host, port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| Error::Bind { addr: addr.clone(), source })?;

        let local_addr = listener
            .local_addr()
            .map_err(|source| Error::Bind { addr, source })?;

        tracing::info!(address = %local_addr, "Listening for connections");

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(accept_loop(listener, Arc::new(self), rx));

        Ok(Listening {
            local_addr,
            tx,
            handle,
        })
    }
}

impl<E: Into<RouteError> + 'static> Service<&TcpStream> for RouterService<E> {
    type Response = RequestService<Incoming, E>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = match conn.peer_addr() {
            Ok(addr) => addr,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        };
        let req_service = self.builder.build(addr);

        ready(Ok(req_service))
    }
}

async fn accept_loop<E>(listener: TcpListener, service: Arc<RouterService<E>>, mut shutdown: oneshot::Receiver<()>)
where
    E: Into<RouteError> + 'static,
{
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Listener shut down");
                break;
            }
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(conn) => conn,
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to accept connection");
                        continue;
                    }
                };

                tracing::debug!(peer_addr = %peer_addr, "Connection accepted");

                let service = service.clone();
                tokio::spawn(async move {
                    let request_service = match service.call(&stream).await {
                        Ok(request_service) => request_service,
                        Err(never) => match never {},
                    };

                    let builder = Builder::new(TokioExecutor::new());
                    if let Err(err) = builder.serve_connection(TokioIo::new(stream), request_service).await {
                        tracing::debug!(peer_addr = %peer_addr, error = %err, "Error serving connection");
                    }
                });
            }
        }
    }
}

/// A running listener started by [`RouterService::listen`]. Dropping it stops accepting new
/// connections, like [`shutdown`](#method.shutdown) does.
#[derive(Debug)]
pub struct Listening {
    local_addr: SocketAddr,
    tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Listening {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting new connections and waits for the accept loop to finish. Connections
    /// already accepted are served to completion.
    pub async fn shutdown(self) {
        let _ = self.tx.send(());
        if let Err(err) = self.handle.await {
            tracing::warn!(error = %err, "Accept loop ended abnormally");
        }
    }
}
