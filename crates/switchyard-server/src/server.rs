//! The HTTP/1.1 listener.
//!
//! Each accepted connection runs on its own task under hyper's HTTP/1.1
//! connection driver. Request bodies are read in full before dispatch, up to
//! [`ServerConfig::max_body_bytes`]; a larger body is answered with 413. The
//! peer address is stored in the request extensions as
//! [`RemoteAddr`](switchyard_middleware::RemoteAddr).
//!
//! ```rust,ignore
//! use switchyard_server::{App, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = App::new().build()?;
//!     Server::new(dispatcher).start("0.0.0.0:8080").await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use switchyard_middleware::{RemoteAddr, Response, ResponseExt};
use tokio::net::{TcpListener, TcpStream};

use crate::config::{parse_addr, ServerConfig};
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Serves a [`Dispatcher`] over TCP.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    dispatcher: Dispatcher,
}

impl Server {
    /// A server for `dispatcher` with the default settings.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher,
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// The current settings.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds `address` and serves until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidAddress`] or [`ServerError::Bind`] if
    /// the listener cannot be set up.
    pub async fn start(self, address: &str) -> Result<(), ServerError> {
        let listener = bind(parse_addr(address)?).await?;
        self.serve(listener, ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and serves until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// As for [`start`](Self::start).
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// As for [`start`](Self::start).
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let listener = bind(self.config.socket_addr()?).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// fires, then waits up to the shutdown timeout for open connections.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the listener's address cannot be read.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            routes = self.dispatcher.routes().len(),
            "Listening"
        );

        let tracker = ConnectionTracker::new();
        let max_body_bytes = self.config.max_body_bytes();

        loop {
            tokio::select! {
                biased;

                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }

                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let token = tracker.acquire();
                        let dispatcher = self.dispatcher.clone();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            serve_connection(
                                dispatcher,
                                stream,
                                remote_addr,
                                shutdown,
                                max_body_bytes,
                            )
                            .await;
                            drop(token);
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to accept connection");
                    }
                },
            }
        }

        let timeout = self.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "Waiting for open connections"
        );
        if tokio::time::timeout(timeout, tracker.wait_idle()).await.is_err() {
            tracing::warn!(
                active = tracker.active_connections(),
                "Shutdown timeout reached with connections still open"
            );
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

async fn serve_connection(
    dispatcher: Dispatcher,
    stream: TcpStream,
    remote_addr: SocketAddr,
    shutdown: ShutdownSignal,
    max_body_bytes: usize,
) {
    let service = service_fn(move |request: http::Request<Incoming>| {
        let dispatcher = dispatcher.clone();
        async move {
            let response = handle_request(&dispatcher, request, remote_addr, max_body_bytes).await;
            Ok::<_, Infallible>(response)
        }
    });

    let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let result = tokio::select! {
        result = connection.as_mut() => result,
        () = shutdown.recv() => {
            connection.as_mut().graceful_shutdown();
            connection.await
        }
    };

    if let Err(e) = result {
        tracing::debug!(remote_addr = %remote_addr, error = %e, "Connection closed with error");
    }
}

async fn handle_request(
    dispatcher: &Dispatcher,
    request: http::Request<Incoming>,
    remote_addr: SocketAddr,
    max_body_bytes: usize,
) -> Response {
    let (parts, body) = request.into_parts();

    let declared = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    let limit = u64::try_from(max_body_bytes).unwrap_or(u64::MAX);
    if declared.is_some_and(|length| length > limit) {
        tracing::warn!(
            remote_addr = %remote_addr,
            http.path = %parts.uri.path(),
            max_body_bytes,
            "Declared request body exceeds limit"
        );
        return dispatcher.finish(payload_too_large());
    }

    let body: Bytes = match Limited::new(body, max_body_bytes).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            tracing::warn!(
                remote_addr = %remote_addr,
                http.path = %parts.uri.path(),
                max_body_bytes,
                "Request body exceeds limit"
            );
            return dispatcher.finish(payload_too_large());
        }
        Err(e) => {
            tracing::warn!(remote_addr = %remote_addr, error = %e, "Failed to read request body");
            return dispatcher.finish(Response::error(StatusCode::BAD_REQUEST, "Bad request"));
        }
    };

    let mut request = http::Request::from_parts(parts, Full::new(body));
    request.extensions_mut().insert(RemoteAddr(remote_addr));
    dispatcher.dispatch(request).await
}

fn payload_too_large() -> Response {
    Response::error(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
}
