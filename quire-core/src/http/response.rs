//! Response helpers for route handlers.
//!
//! These functions build the handful of response shapes the server uses so
//! handlers don't assemble `Response::builder()` chains by hand.

use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use hyper::Response;

pub type Resp = Response<Full<Bytes>>;

/// JSON response with the given status code.
pub fn json(status: StatusCode, body: impl Into<String>) -> Resp {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.into())))
        .expect("valid HTTP response")
}

/// Serialize `value` as a JSON response.
pub fn json_value<T: serde::Serialize>(status: StatusCode, value: &T) -> Resp {
    match serde_json::to_string(value) {
        Ok(body) => json(status, body),
        Err(e) => {
            log::error!("Failed to serialize response body: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Failed to build response")
        }
    }
}

/// JSON error with a uniform shape: `{"error": "snake_code", "message": "detail"}`
pub fn json_error(status: StatusCode, code: &str, message: &str) -> Resp {
    let body = serde_json::json!({ "error": code, "message": message });
    json(status, body.to_string())
}

/// HTML response with the given status code.
pub fn html(status: StatusCode, body: impl Into<String>) -> Resp {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Full::new(Bytes::from(body.into())))
        .expect("valid HTTP response")
}

/// 302 redirect issued by the route guard.
pub fn redirect(location: &str) -> Resp {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Full::new(Bytes::new()))
        .expect("valid HTTP response")
}

/// 303 See Other after a form post, optionally setting a cookie.
pub fn see_other(location: &str, set_cookie: Option<&str>) -> Resp {
    let mut builder = Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, location)
        .header(header::CACHE_CONTROL, "no-store");
    if let Some(cookie) = set_cookie {
        builder = builder.header(header::SET_COOKIE, cookie);
    }
    builder.body(Full::new(Bytes::new())).expect("valid HTTP response")
}

/// 405 Method Not Allowed with Allow header
pub fn method_not_allowed(allowed: &str) -> Resp {
    let mut resp = json_error(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", "Method not allowed");
    if let Ok(value) = http::HeaderValue::from_str(allowed) {
        resp.headers_mut().insert(header::ALLOW, value);
    }
    resp
}

/// Escape text for inclusion in HTML element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
