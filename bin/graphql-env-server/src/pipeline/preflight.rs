use http::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};
use ntex::{
    http::{header::HeaderValue, HeaderMap},
    web,
};
use tracing::debug;

const PREFLIGHT_METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];
const PREFLIGHT_METHODS_VALUE: &str = "GET, POST, PUT, DELETE";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

/// Answers a CORS preflight request from its headers alone.
pub fn preflight_response(headers: &HeaderMap) -> web::HttpResponse {
    let requested_method = headers
        .get(ACCESS_CONTROL_REQUEST_METHOD)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_uppercase())
        .unwrap_or_default();

    if !PREFLIGHT_METHODS.contains(&requested_method.as_str()) {
        debug!("preflight rejected for method '{}'", requested_method);
        return web::HttpResponse::BadRequest().finish();
    }

    let origin = headers
        .get(ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(""));

    web::HttpResponse::Ok()
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, origin)
        .header(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(PREFLIGHT_METHODS_VALUE),
        )
        .header(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
        )
        .finish()
}
