use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response};
// Import the prelude traits.
use segroute::prelude::*;
use segroute::{Next, Router, RouterService};
use std::convert::Infallible;

// A handler for "/users/:userName/books/:bookName?" page.
async fn user_book_handler(
    req: Request<Incoming>,
    mut res: Response<Full<Bytes>>,
) -> Result<Next<Incoming>, Infallible> {
    let user_name = req.param("userName").cloned().unwrap_or_default();
    let book_name = req.param("bookName").cloned().unwrap_or_else(|| "every book".to_owned());

    *res.body_mut() = Full::from(format!("User: {}, Book: {}", user_name, book_name));
    Ok(Next::Complete(res))
}

// A handler for "/files/*" page.
async fn files_handler(
    req: Request<Incoming>,
    mut res: Response<Full<Bytes>>,
) -> Result<Next<Incoming>, Infallible> {
    let file = req.param("*").cloned().unwrap_or_default();

    *res.body_mut() = Full::from(format!("File: {}", file));
    Ok(Next::Complete(res))
}

fn router() -> Router<Incoming, Infallible> {
    Router::builder()
        // `/users/alice%20b` gives the parameter `alice b`, and the book may be left out.
        .get("/users/:userName/books/:bookName?", user_book_handler)
        .get("/files/*", files_handler)
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
