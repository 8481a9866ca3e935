//! Server and dispatch errors.

use std::net::SocketAddr;

use http::{Method, StatusCode};
use switchyard_middleware::{Response, ResponseExt};
use switchyard_session::SessionError;
use thiserror::Error;

/// Errors that end a single request.
///
/// Each maps to a plain-text response; nothing is retried. The dispatcher
/// raises `NotFound` itself. `Session` is for handlers that call the
/// [`SessionStore`](switchyard_session::SessionStore) directly: convert the
/// [`SessionError`] with `?` or `From` and answer with
/// [`into_response`](Self::into_response). The session middleware answers
/// its own store failures without going through this type.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route matches the method and path.
    #[error("no route for {method} {path}")]
    NotFound {
        /// Request method.
        method: Method,
        /// Request path.
        path: String,
    },

    /// A handler's session store call failed.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl DispatchError {
    /// Status code sent to the client.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the error as a response.
    ///
    /// Bodies never carry error details: `Not found` or
    /// `Internal server error`.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::NotFound { .. } => Response::not_found(),
            Self::Session(_) => Response::internal_error(),
        }
    }
}

/// Fatal errors starting or running the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address did not parse.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The listener could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A configured default header is not a valid header value.
    #[error("invalid value for default header {name}: {value:?}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// I/O error on the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
