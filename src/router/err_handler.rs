use crate::types::RequestInfo;
use crate::RouteError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::future::Future;
use std::pin::Pin;

pub(crate) type ErrHandlerWithoutInfo = Box<dyn Fn(RouteError) -> ErrHandlerReturn + Send + Sync + 'static>;
pub(crate) type ErrHandlerWithInfo = Box<dyn Fn(RouteError, RequestInfo) -> ErrHandlerReturn + Send + Sync + 'static>;
pub(crate) type ErrHandlerReturn = Box<dyn Future<Output = Response<Full<Bytes>>> + Send + 'static>;

/// The single entry point every handler error funnels through.
pub(crate) enum ErrHandler {
    WithoutInfo(ErrHandlerWithoutInfo),
    WithInfo(ErrHandlerWithInfo),
}

impl ErrHandler {
    pub(crate) fn without_info<H, R>(handler: H) -> ErrHandler
    where
        H: Fn(RouteError) -> R + Send + Sync + 'static,
        R: Future<Output = Response<Full<Bytes>>> + Send + 'static,
    {
        ErrHandler::WithoutInfo(Box::new(move |err: RouteError| -> ErrHandlerReturn { Box::new(handler(err)) }))
    }

    pub(crate) fn with_info<H, R>(handler: H) -> ErrHandler
    where
        H: Fn(RouteError, RequestInfo) -> R + Send + Sync + 'static,
        R: Future<Output = Response<Full<Bytes>>> + Send + 'static,
    {
        ErrHandler::WithInfo(Box::new(
            move |err: RouteError, req_info: RequestInfo| -> ErrHandlerReturn { Box::new(handler(err, req_info)) },
        ))
    }

    pub(crate) fn should_gen_req_info(&self) -> bool {
        matches!(self, ErrHandler::WithInfo(_))
    }

    pub(crate) async fn execute(&self, err: RouteError, req_info: Option<RequestInfo>) -> Response<Full<Bytes>> {
        match self {
            ErrHandler::WithoutInfo(handler) => Pin::from(handler(err)).await,
            ErrHandler::WithInfo(handler) => Pin::from(handler(err, req_info.unwrap_or_default())).await,
        }
    }
}

impl Default for ErrHandler {
    /// Writes the error message as the whole response body.
    fn default() -> Self {
        ErrHandler::without_info(|err: RouteError| async move { default_error_response(&err) })
    }
}

pub(crate) fn default_error_response(err: &RouteError) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::from(err.to_string()));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use http_body_util::BodyExt;

    async fn body_text(res: Response<Full<Bytes>>) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn default_handler_writes_the_message() {
        let handler = ErrHandler::default();
        assert!(!handler.should_gen_req_info());

        let res = handler.execute(Error::new("database is down").into(), None).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(res).await, "database is down");
    }

    #[tokio::test]
    async fn info_handler_receives_request_info() {
        let handler = ErrHandler::with_info(|err: RouteError, info: RequestInfo| async move {
            Response::new(Full::from(format!("{} {}", info.method(), err)))
        });
        assert!(handler.should_gen_req_info());

        let res = handler.execute(Error::new("oops").into(), None).await;
        assert_eq!(body_text(res).await, "GET oops");
    }
}
