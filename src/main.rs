use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Response, StatusCode};
use segroute::prelude::*;
use segroute::{Error, Middleware, Next, RequestInfo, RouteError, Router, RouterService};
use tracing_subscriber::EnvFilter;

// A middleware which logs an http request.
fn logger() -> Middleware<Incoming, Error> {
    Middleware::new(|req, res| async move {
        tracing::info!(
            remote_addr = ?req.remote_addr(),
            method = %req.method(),
            path = req.path(),
            "Incoming request"
        );
        Ok(Next::Continue(req, res))
    })
}

async fn error_handler(err: RouteError, info: RequestInfo) -> Response<Full<Bytes>> {
    tracing::error!(error = %err, method = %info.method(), uri = %info.uri(), "Request failed");

    let mut res = Response::new(Full::from(format!("Something went wrong: {}", err)));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res
}

fn router() -> segroute::Result<Router<Incoming, Error>> {
    Router::builder()
        .middleware(logger())
        .get("/", |_req, mut res| async move {
            *res.body_mut() = Full::from("Home page");
            Ok(Next::Complete(res))
        })
        .get("/users/:userId", |req, mut res| async move {
            let user_id = req.param("userId").cloned().unwrap_or_default();
            *res.body_mut() = Full::from(format!("Hello {}", user_id));
            Ok(Next::Complete(res))
        })
        .get("/search", |req, mut res| async move {
            match req.query_param("q") {
                Some(term) => {
                    *res.body_mut() = Full::from(format!("Results for {}", term));
                    Ok(Next::Complete(res))
                }
                None => Err(Error::new("missing query parameter `q`")),
            }
        })
        .any_method("/health", |_req, mut res| async move {
            *res.body_mut() = Full::from("ok");
            Ok(Next::Complete(res))
        })
        .err_handler_with_info(error_handler)
        .build()
}

#[tokio::main]
async fn main() -> segroute::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let port = match std::env::var("PORT") {
        Ok(port) => port
            .parse::<u16>()
            .map_err(|err| Error::new(format!("Invalid PORT {:?}: {}", port, err)))?,
        Err(_) => 3000,
    };

    let listening = RouterService::new(router()?).listen(port, &host).await?;
    tracing::info!(address = %listening.local_addr(), "App is running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    listening.shutdown().await;

    Ok(())
}
