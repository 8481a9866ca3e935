//! Request and response types shared by middleware and handlers.

use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// The HTTP request type seen by middleware and handlers.
///
/// The body has already been read in full.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by middleware and handlers.
pub type Response = http::Response<Full<Bytes>>;

/// Content type used by [`ResponseExt::text`] and error responses.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Content type used by [`ResponseExt::html`].
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Content type used by [`ResponseExt::json`].
pub const APPLICATION_JSON: &str = "application/json";

/// Body of every 500 response produced by the framework.
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Body of every 404 response produced by the framework.
pub const NOT_FOUND_BODY: &str = "Not found";

fn build(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response {
    let mut response = http::Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Constructors for common responses.
pub trait ResponseExt {
    /// A plain-text response.
    fn text(status: StatusCode, body: impl Into<Bytes>) -> Response;

    /// A `200 OK` HTML response.
    fn html(body: impl Into<Bytes>) -> Response;

    /// A `200 OK` JSON response from a serializable value.
    ///
    /// Falls back to a plain-text 500 if serialization fails.
    fn json<T: Serialize + ?Sized>(value: &T) -> Response;

    /// A `200 OK` JSON response from an already encoded document.
    fn json_raw(body: impl Into<Bytes>) -> Response;

    /// A plain-text error response.
    fn error(status: StatusCode, message: &str) -> Response;

    /// `404 Not Found` with body `Not found`.
    fn not_found() -> Response;

    /// `500 Internal Server Error` with body `Internal server error`.
    fn internal_error() -> Response;

    /// A redirect to `location` with the given 3xx status.
    fn redirect(status: StatusCode, location: &str) -> Response;
}

impl ResponseExt for Response {
    fn text(status: StatusCode, body: impl Into<Bytes>) -> Response {
        build(status, TEXT_PLAIN, body)
    }

    fn html(body: impl Into<Bytes>) -> Response {
        build(StatusCode::OK, TEXT_HTML, body)
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> Response {
        match serde_json::to_vec(value) {
            Ok(body) => build(StatusCode::OK, APPLICATION_JSON, body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize JSON response");
                Self::internal_error()
            }
        }
    }

    fn json_raw(body: impl Into<Bytes>) -> Response {
        build(StatusCode::OK, APPLICATION_JSON, body)
    }

    fn error(status: StatusCode, message: &str) -> Response {
        build(status, TEXT_PLAIN, message.to_string())
    }

    fn not_found() -> Response {
        build(StatusCode::NOT_FOUND, TEXT_PLAIN, NOT_FOUND_BODY)
    }

    fn internal_error() -> Response {
        build(StatusCode::INTERNAL_SERVER_ERROR, TEXT_PLAIN, INTERNAL_ERROR_BODY)
    }

    fn redirect(status: StatusCode, location: &str) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = status;
        match HeaderValue::from_str(location) {
            Ok(value) => {
                response.headers_mut().insert(header::LOCATION, value);
                response
            }
            Err(_) => {
                tracing::error!(location, "Redirect target is not a valid header value");
                Self::internal_error()
            }
        }
    }
}
