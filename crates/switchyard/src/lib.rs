//! # Switchyard
//!
//! A small HTTP router: `:name` path parameters, an ordered middleware
//! chain around every request, and server-side sessions keyed by a cookie.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchyard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SessionStore::new());
//!
//!     let dispatcher = App::new()
//!         .use_middleware(SessionMiddleware::new(store))
//!         .use_middleware(LoggerMiddleware::new())
//!         .get("/users/:id", |req: Request| async move {
//!             Response::json(&req.params().map(Params::to_map))
//!         })
//!         .build()?;
//!
//!     Server::new(dispatcher).start("0.0.0.0:8080").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`router`] | pattern compiler and route table |
//! | [`middleware`] | middleware chain, built-in stages, request/response helpers |
//! | [`session`] | session store |
//! | [`server`] | dispatcher and listener |
//! | [`config`] | layered configuration |
//! | [`telemetry`] | logging setup |

pub use switchyard_config as config;
pub use switchyard_middleware as middleware;
pub use switchyard_router as router;
pub use switchyard_server as server;
pub use switchyard_session as session;
pub use switchyard_telemetry as telemetry;

pub use http::{Method, StatusCode};

/// Common imports.
///
/// ```rust
/// use switchyard::prelude::*;
///
/// let dispatcher = App::new()
///     .get("/", |_req: Request| async { Response::html("<h1>Home</h1>") })
///     .build()
///     .unwrap();
/// assert_eq!(dispatcher.routes().len(), 1);
/// ```
pub mod prelude {
    pub use http::{Method, StatusCode};

    pub use switchyard_config::{ConfigLoader, SwitchyardConfig};
    pub use switchyard_middleware::{
        body_bytes, form, BoxFuture, Cookies, FnMiddleware, LoggerMiddleware, Middleware, Next,
        Request, RequestExt, Response, ResponseExt, SessionMiddleware, SetCookie,
    };
    pub use switchyard_router::{Params, Router};
    pub use switchyard_server::{
        session_stage, App, DefaultHeaders, DispatchError, Dispatcher, Server, ServerConfig,
        ShutdownSignal,
    };
    pub use switchyard_session::{Session, SessionError, SessionStore};
    pub use switchyard_telemetry::{init_logging, LogConfig};
}
