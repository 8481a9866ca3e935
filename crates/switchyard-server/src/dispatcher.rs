//! Route registration and request dispatch.
//!
//! [`App`] collects routes, middleware and default headers. [`App::build`]
//! composes the middleware chain once around a routing handler and freezes
//! the route table, producing a cheaply cloneable [`Dispatcher`].
//!
//! ```text
//! request ─▶ middleware[0] ─▶ … ─▶ middleware[n] ─▶ route lookup ─▶ handler
//!                                                   └─ miss ─▶ 404 Not found
//! response ◀─ default headers filled in where absent
//! ```

use std::fmt;
use std::sync::Arc;

use http::Method;
use switchyard_middleware::{
    BoxFuture, BoxedHandler, BoxedMiddleware, Chain, Handler, Middleware, Request, Response,
};
use switchyard_router::Router;

use crate::error::{DispatchError, ServerError};
use crate::headers::{CompiledHeaders, DefaultHeaders};

/// Registration surface for routes, middleware and default headers.
///
/// ```rust
/// use http::StatusCode;
/// use switchyard_middleware::{LoggerMiddleware, Request, RequestExt, Response, ResponseExt};
/// use switchyard_server::App;
///
/// let dispatcher = App::new()
///     .use_middleware(LoggerMiddleware::new())
///     .get("/users/:id", |req: Request| async move {
///         let id = req.param("id").unwrap_or_default().to_string();
///         Response::text(StatusCode::OK, id)
///     })
///     .build()
///     .unwrap();
/// assert_eq!(dispatcher.routes().len(), 1);
/// ```
#[derive(Default)]
pub struct App {
    routes: Router<BoxedHandler>,
    middleware: Vec<BoxedMiddleware>,
    headers: DefaultHeaders,
}

impl App {
    /// An application with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` on `path`.
    ///
    /// Registering the same method and path again replaces the handler.
    #[must_use]
    pub fn route<H: Handler>(mut self, method: Method, path: &str, handler: H) -> Self {
        let replaced = self
            .routes
            .register(method.clone(), path, Arc::new(handler))
            .is_some();
        if replaced {
            tracing::debug!(http.method = %method, route = path, "Route handler replaced");
        }
        self
    }

    /// Registers a `GET` handler.
    #[must_use]
    pub fn get<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(Method::GET, path, handler)
    }

    /// Registers a `POST` handler.
    #[must_use]
    pub fn post<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(Method::POST, path, handler)
    }

    /// Registers a `PUT` handler.
    #[must_use]
    pub fn put<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(Method::PUT, path, handler)
    }

    /// Registers a `DELETE` handler.
    #[must_use]
    pub fn delete<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(Method::DELETE, path, handler)
    }

    /// Registers an `OPTIONS` handler.
    #[must_use]
    pub fn options<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(Method::OPTIONS, path, handler)
    }

    /// Registers a `HEAD` handler.
    #[must_use]
    pub fn head<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(Method::HEAD, path, handler)
    }

    /// Appends a middleware. The first one added runs outermost.
    #[must_use]
    pub fn use_middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Sets the default response headers.
    #[must_use]
    pub fn headers(mut self, headers: DefaultHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Freezes the routes and composes the chain.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidHeader`] if a default header value is
    /// not a valid header value.
    pub fn build(self) -> Result<Dispatcher, ServerError> {
        let headers = self.headers.compile()?;

        for route in self.routes.routes() {
            let methods: Vec<&str> = route.methods().methods().map(Method::as_str).collect();
            tracing::debug!(route = route.pattern().path(), methods = ?methods, "Route registered");
        }
        let names: Vec<&str> = self.middleware.iter().map(|m| m.name()).collect();
        tracing::debug!(middleware = ?names, "Middleware chain composed");

        let routes = Arc::new(self.routes);
        let terminal: BoxedHandler = Arc::new(RouteHandler {
            routes: Arc::clone(&routes),
        });

        Ok(Dispatcher {
            chain: Chain::compose(&self.middleware, terminal),
            routes,
            headers: Arc::new(headers),
        })
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.routes)
            .field("middleware", &self.middleware.len())
            .field("headers", &self.headers)
            .finish()
    }
}

/// The innermost handler: route lookup and invocation.
struct RouteHandler {
    routes: Arc<Router<BoxedHandler>>,
}

impl Handler for RouteHandler {
    fn call(&self, mut request: Request) -> BoxFuture<'static, Response> {
        let resolved = self
            .routes
            .resolve(request.method(), request.uri().path())
            .map(|matched| (Arc::clone(matched.handler), matched.params));

        match resolved {
            Some((handler, params)) => {
                request.extensions_mut().insert(params);
                handler.call(request)
            }
            None => {
                let path = request.uri().path().to_string();
                let allowed = self.routes.allowed_methods(&path);
                if !allowed.is_empty() {
                    tracing::debug!(http.path = %path, allowed = ?allowed, "Method not registered for path");
                }
                let error = DispatchError::NotFound {
                    method: request.method().clone(),
                    path,
                };
                tracing::debug!(error = %error, "No matching route");
                Box::pin(async move { error.into_response() })
            }
        }
    }
}

/// A built application, ready to answer requests.
///
/// Cloning shares the composed chain and the frozen route table.
#[derive(Clone)]
pub struct Dispatcher {
    chain: BoxedHandler,
    routes: Arc<Router<BoxedHandler>>,
    headers: Arc<CompiledHeaders>,
}

impl Dispatcher {
    /// Runs one request through the chain and fills in default headers.
    pub async fn dispatch(&self, request: Request) -> Response {
        let response = self.chain.call(request).await;
        self.finish(response)
    }

    /// Fills in default headers on a response produced outside the chain.
    ///
    /// Responses the server writes before a request reaches the chain, such
    /// as body read failures, go through here so they carry the same
    /// defaults as routed responses.
    #[must_use]
    pub fn finish(&self, mut response: Response) -> Response {
        self.headers.apply(response.headers_mut());
        response
    }

    /// The frozen route table.
    #[must_use]
    pub fn routes(&self) -> &Router<BoxedHandler> {
        &self.routes
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
