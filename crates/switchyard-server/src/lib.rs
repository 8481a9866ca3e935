//! HTTP listener and request dispatcher for Switchyard.
//!
//! - [`App`] registers routes, middleware and default headers
//! - [`Dispatcher`] runs a request through the composed chain
//! - [`Server`] accepts TCP connections and feeds them to a dispatcher
//! - [`ShutdownSignal`] stops a running server gracefully
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchyard_middleware::{LoggerMiddleware, SessionMiddleware};
//! use switchyard_server::{App, DefaultHeaders, Server};
//! use switchyard_session::SessionStore;
//!
//! let store = Arc::new(SessionStore::new());
//! let dispatcher = App::new()
//!     .headers(DefaultHeaders::permissive_html())
//!     .use_middleware(SessionMiddleware::new(store))
//!     .use_middleware(LoggerMiddleware::new())
//!     .get("/", index)
//!     .build()?;
//!
//! Server::new(dispatcher).start("0.0.0.0:8080").await?;
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod headers;
pub mod server;
pub mod shutdown;

pub use config::{
    session_stage, ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES,
};
pub use dispatcher::{App, Dispatcher};
pub use error::{DispatchError, ServerError};
pub use headers::DefaultHeaders;
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
