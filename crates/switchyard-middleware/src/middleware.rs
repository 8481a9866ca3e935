//! Core handler and middleware traits.
//!
//! A [`Handler`] turns a request into a response. A [`Middleware`] wraps the
//! rest of the chain: it receives the request together with a [`Next`] and
//! decides whether, and with what request, to continue.
//!
//! # Example
//!
//! ```rust
//! use switchyard_middleware::{BoxFuture, Middleware, Next, Request, Response};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(&'a self, request: Request, next: Next) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let start = std::time::Instant::now();
//!             let response = next.run(request).await;
//!             tracing::debug!(elapsed = ?start.elapsed(), "request finished");
//!             response
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::types::{Request, Response};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that answers a request.
///
/// Implemented for every `Fn(Request) -> impl Future<Output = Response>`
/// closure or function that is `Send + Sync + 'static`.
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, request: Request) -> BoxFuture<'static, Response>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        Box::pin(self(request))
    }
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// A stage that wraps the rest of the chain.
///
/// Returning a response without calling [`Next::run`] short-circuits
/// everything inside this stage, including the route handler.
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request, optionally delegating to `next`.
    fn process<'a>(&'a self, request: Request, next: Next) -> BoxFuture<'a, Response>;
}

/// The remainder of the chain below a middleware.
///
/// Consumed by [`run`](Next::run), so it can be invoked at most once.
pub struct Next {
    inner: BoxedHandler,
}

impl Next {
    /// Wraps the handler that runs after the current stage.
    #[must_use]
    pub fn new(inner: BoxedHandler) -> Self {
        Self { inner }
    }

    /// Runs the rest of the chain.
    pub async fn run(self, request: Request) -> Response {
        self.inner.call(request).await
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A middleware built from a closure.
///
/// ```rust
/// use switchyard_middleware::{FnMiddleware, Next, Request};
///
/// let tag = FnMiddleware::new("tag", |request: Request, next: Next| async move {
///     let mut response = next.run(request).await;
///     response
///         .headers_mut()
///         .insert("x-served-by", http::HeaderValue::from_static("switchyard"));
///     response
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a named closure middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, request: Request, next: Next) -> BoxFuture<'a, Response> {
        Box::pin((self.func)(request, next))
    }
}
