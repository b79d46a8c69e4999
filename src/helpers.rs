use crate::types::{QueryParams, RequestMeta};
use bytes::Bytes;
use http::Extensions;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

pub(crate) const NOT_FOUND_BODY: &str = "Not Found";

pub(crate) fn update_req_meta_in_extensions(ext: &mut Extensions, req_meta: RequestMeta) {
    if let Some(existing_req_meta) = ext.get_mut::<RequestMeta>() {
        existing_req_meta.extend(req_meta);
    } else {
        ext.insert(req_meta);
    }
}

pub(crate) fn percent_decode_piece(piece: &str) -> Cow<'_, str> {
    percent_decode_str(piece).decode_utf8_lossy()
}

pub(crate) fn parse_query(raw: &str) -> QueryParams {
    url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
}

pub(crate) fn not_found_response() -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::from(NOT_FOUND_BODY));
    *res.status_mut() = StatusCode::NOT_FOUND;
    res
}
