use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{header, Request, Response, StatusCode};
use segroute::prelude::*;
use segroute::{Next, RequestInfo, RouteError, Router, RouterService};
use std::io;

// A handler for "/" page.
async fn home_handler(_req: Request<Incoming>, _res: Response<Full<Bytes>>) -> Result<Next<Incoming>, io::Error> {
    Err(io::Error::other("Some errors"))
}

// A handler for "/orders/:id" page which gives up through an explicit abort.
async fn order_handler(req: Request<Incoming>, _res: Response<Full<Bytes>>) -> Result<Next<Incoming>, io::Error> {
    let id = req.param("id").cloned().unwrap_or_default();
    Ok(Next::abort(format!("Order {} is locked", id)))
}

// Define an error handler function which will accept the `segroute::RouteError` and the `info`
// and generates an appropriate response.
async fn error_handler(err: RouteError, info: RequestInfo) -> Response<Full<Bytes>> {
    eprintln!("{} {}: {}", info.method(), info.uri(), err);

    let mut res = Response::new(Full::from(format!("Something went wrong: {}", err)));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;

    // Echo the cookie back, if the client sent one.
    if let Some(cookie) = info.headers().get(header::COOKIE) {
        res.headers_mut().insert(header::SET_COOKIE, cookie.clone());
    }
    // The route parameters were extracted before the failure.
    if let Some(id) = info.params().get("id") {
        if let Ok(value) = id.parse() {
            res.headers_mut().insert("x-order-id", value);
        }
    }
    res
}

fn router() -> Router<Incoming, io::Error> {
    Router::builder()
        .get("/", home_handler)
        .get("/orders/:id", order_handler)
        // Specify the error handler to handle any errors caused by
        // a route or any middleware.
        .err_handler_with_info(error_handler)
        .build()
        .unwrap()
}

#[tokio::main]
async fn main() -> segroute::Result<()> {
    let listening = RouterService::new(router()).listen(3001, "127.0.0.1").await?;
    println!("App is running on: {}", listening.local_addr());

    tokio::signal::ctrl_c().await?;
    listening.shutdown().await;
    Ok(())
}
