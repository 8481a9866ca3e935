//! Path pattern compiler and route table for Switchyard.
//!
//! Routes are declared as `/literal/:param/...` paths. Each declared path is
//! compiled once into a [`Pattern`] of positional segments; requests are
//! matched segment by segment, so a parameter binds exactly one non-empty
//! segment and the segment counts must agree.
//!
//! # Example
//!
//! ```rust
//! use switchyard_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.register(Method::GET, "/users/:id/items/:itemId", "getItem");
//!
//! let found = router.resolve(&Method::GET, "/users/42/items/7").unwrap();
//! assert_eq!(*found.handler, "getItem");
//! assert_eq!(found.params.get("id"), Some("42"));
//! assert_eq!(found.params.get("itemId"), Some("7"));
//!
//! assert!(router.resolve(&Method::GET, "/users/42/items").is_none());
//! ```
//!
//! The table is a plain list scanned in registration order. Applications
//! register a handful of routes at startup and never mutate the table
//! afterwards.

mod method_router;
mod params;
mod pattern;
mod router;

pub use method_router::MethodRouter;
pub use params::Params;
pub use pattern::{Pattern, Segment};
pub use router::{Route, Router};

/// A resolved route: the handler, the bound parameters and the declared path.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteMatch<'a, H> {
    /// Handler registered for the method and path.
    pub handler: &'a H,
    /// Parameters bound from the request path.
    pub params: Params,
    /// The declared path of the matched route.
    pub pattern: &'a str,
}

impl<'a, H> RouteMatch<'a, H> {
    /// Creates a route match.
    #[must_use]
    pub fn new(handler: &'a H, params: Params, pattern: &'a str) -> Self {
        Self {
            handler,
            params,
            pattern,
        }
    }

    /// Returns a parameter value by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_route_match_param() {
        let mut params = Params::new();
        params.push("id", "42");
        let handler = "getUser";
        let found = RouteMatch::new(&handler, params, "/users/:id");

        assert_eq!(found.param("id"), Some("42"));
        assert_eq!(found.param("name"), None);
    }

    #[test]
    fn test_playground_routes() {
        let mut router = Router::new();
        router.register(Method::GET, "/", "index");
        router.register(Method::GET, "/data", "data");
        router.register(Method::GET, "/return-struct", "struct");
        router.register(Method::GET, "/query", "query");
        router.register(Method::GET, "/test-post", "form");
        router.register(Method::POST, "/test-post", "submit");

        assert_eq!(*router.resolve(&Method::GET, "/").unwrap().handler, "index");
        assert_eq!(
            *router.resolve(&Method::POST, "/test-post").unwrap().handler,
            "submit"
        );
        assert!(router.resolve(&Method::GET, "/missing").is_none());
        assert!(router.resolve(&Method::GET, "").is_none());
    }
}
