//! Middleware composition.
//!
//! [`Chain::compose`] folds an ordered list of middleware around a terminal
//! handler once, at build time. The first middleware in the list becomes
//! the outermost layer:
//!
//! ```text
//! [A, B, C] + H  =>  A(B(C(H)))
//!
//! request  ──▶ A ──▶ B ──▶ C ──▶ H
//! response ◀── A ◀── B ◀── C ◀──┘
//! ```

use std::sync::Arc;

use crate::middleware::{BoxFuture, BoxedHandler, Handler, Middleware, Next};
use crate::types::{Request, Response};

/// A shared, type-erased middleware.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Builds composed handlers from middleware lists.
#[derive(Debug, Clone, Copy)]
pub struct Chain;

impl Chain {
    /// Wraps `terminal` in `middlewares`, first entry outermost.
    ///
    /// An empty list returns `terminal` unchanged.
    #[must_use]
    pub fn compose(middlewares: &[BoxedMiddleware], terminal: BoxedHandler) -> BoxedHandler {
        middlewares
            .iter()
            .rev()
            .fold(terminal, |next, middleware| {
                Arc::new(Layer {
                    middleware: Arc::clone(middleware),
                    next,
                })
            })
    }
}

/// One middleware bound to the handler it wraps.
struct Layer {
    middleware: BoxedMiddleware,
    next: BoxedHandler,
}

impl Handler for Layer {
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        let middleware = Arc::clone(&self.middleware);
        let next = Next::new(Arc::clone(&self.next));
        Box::pin(async move { middleware.process(request, next).await })
    }
}
