//! Access logging middleware.

use std::time::Instant;

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::request_ext::RequestExt;
use crate::types::{Request, Response};

/// Logs each request on arrival and its status once the response is ready.
///
/// Arrival is logged at `info` with the peer address, path, method and raw
/// query string. Completion adds the status code and latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerMiddleware;

impl LoggerMiddleware {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for LoggerMiddleware {
    fn name(&self) -> &'static str {
        "logger"
    }

    fn process<'a>(&'a self, request: Request, next: Next) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let start = Instant::now();
            let method = request.method().clone();
            let path = request.uri().path().to_string();
            let remote = request
                .remote_addr()
                .map_or_else(|| "-".to_string(), |addr| addr.to_string());

            tracing::info!(
                remote_addr = %remote,
                http.path = %path,
                http.method = %method,
                http.query = request.uri().query().unwrap_or(""),
                "Connection received"
            );

            let response = next.run(request).await;

            tracing::info!(
                http.path = %path,
                http.method = %method,
                http.status_code = response.status().as_u16(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Request completed"
            );
            response
        })
    }
}
