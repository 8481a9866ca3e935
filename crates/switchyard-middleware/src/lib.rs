//! Middleware chain for Switchyard.
//!
//! Middleware wraps a handler and yields a handler of the same shape. The
//! application declares an ordered list; [`Chain::compose`] nests it around
//! the router so that the first declared middleware runs outermost, both
//! before and after the request.
//!
//! ```rust
//! use std::sync::Arc;
//! use switchyard_middleware::{
//!     BoxedHandler, BoxedMiddleware, Chain, FnMiddleware, Next, Request, Response, ResponseExt,
//! };
//! use http::StatusCode;
//!
//! let deny: BoxedMiddleware = Arc::new(FnMiddleware::new("deny", |_req: Request, _next: Next| async {
//!     Response::error(StatusCode::FORBIDDEN, "Forbidden")
//! }));
//! let handler: BoxedHandler = Arc::new(|_req: Request| async {
//!     Response::text(StatusCode::OK, "hello")
//! });
//!
//! let composed = Chain::compose(&[deny], handler);
//! # let _ = composed;
//! ```
//!
//! Besides the chain itself the crate carries the request and response
//! helpers handlers use ([`RequestExt`], [`ResponseExt`], [`Cookies`]) and
//! the built-in [`stages`].

pub mod chain;
pub mod cookie;
pub mod middleware;
pub mod request_ext;
pub mod stages;
pub mod types;

pub use chain::{BoxedMiddleware, Chain};
pub use cookie::{Cookies, SameSite, SetCookie};
pub use middleware::{BoxFuture, BoxedHandler, FnMiddleware, Handler, Middleware, Next};
pub use request_ext::{body_bytes, form, RemoteAddr, RequestExt};
pub use stages::{LoggerMiddleware, SessionMiddleware, SESSION_COOKIE};
pub use types::{Request, Response, ResponseExt};
