pub use self::request_service::{RequestService, RequestServiceBuilder};
pub use self::router_service::{Listening, RouterService};

mod request_service;
mod router_service;
