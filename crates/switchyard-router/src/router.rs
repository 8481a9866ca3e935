//! The route table.
//!
//! [`Router`] keeps one entry per declared path, each holding the compiled
//! [`Pattern`] and a [`MethodRouter`]. Resolution scans the entries in
//! registration order and keeps the most specific match.

use std::collections::HashMap;
use std::fmt;

use http::Method;

use crate::method_router::MethodRouter;
use crate::pattern::Pattern;
use crate::RouteMatch;

/// A registered path with its per-method handlers.
#[derive(Clone)]
pub struct Route<H> {
    pattern: Pattern,
    methods: MethodRouter<H>,
}

impl<H> Route<H> {
    /// The compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The handlers bound on this path.
    #[must_use]
    pub fn methods(&self) -> &MethodRouter<H> {
        &self.methods
    }
}

/// Route table mapping `(method, path)` to handlers.
///
/// # Example
///
/// ```rust
/// use switchyard_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.register(Method::GET, "/users/:id", "getUser");
/// router.register(Method::GET, "/users/new", "newUserForm");
///
/// let found = router.resolve(&Method::GET, "/users/42").unwrap();
/// assert_eq!(*found.handler, "getUser");
/// assert_eq!(found.params.get("id"), Some("42"));
///
/// // Literal segments win over parameters at the same position.
/// let found = router.resolve(&Method::GET, "/users/new").unwrap();
/// assert_eq!(*found.handler, "newUserForm");
///
/// // No route for this method.
/// assert!(router.resolve(&Method::POST, "/users/42").is_none());
/// ```
///
/// # Route Priority
///
/// When several patterns match a path:
///
/// 1. At the first segment where one has a literal and the other a
///    parameter, the literal wins.
/// 2. Otherwise the path registered first wins.
pub struct Router<H> {
    routes: Vec<Route<H>>,
    by_path: HashMap<String, usize>,
    handler_count: usize,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> Clone for Router<H> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
            by_path: self.by_path.clone(),
            handler_count: self.handler_count,
        }
    }
}

impl<H> Router<H> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            by_path: HashMap::new(),
            handler_count: 0,
        }
    }

    /// Registers `handler` for `method` on the declared `path`.
    ///
    /// Registering the same `(path, method)` again replaces the earlier
    /// handler, which is returned. Methods on the same path share one
    /// compiled pattern.
    pub fn register(&mut self, method: Method, path: &str, handler: H) -> Option<H> {
        let index = match self.by_path.get(path) {
            Some(&index) => index,
            None => {
                self.routes.push(Route {
                    pattern: Pattern::compile(path),
                    methods: MethodRouter::new(),
                });
                let index = self.routes.len() - 1;
                self.by_path.insert(path.to_string(), index);
                index
            }
        };

        let replaced = self.routes[index].methods.insert(method, handler);
        if replaced.is_none() {
            self.handler_count += 1;
        }
        replaced
    }

    /// Registers every handler in `methods` on `path`.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<H>) {
        for (method, handler) in methods {
            self.register(method, path, handler);
        }
    }

    /// Finds the handler for `method` and `path`.
    ///
    /// Only routes that bind `method` take part. A path that matches only
    /// under a different method resolves to `None`.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        let mut best: Option<&Route<H>> = None;

        for route in &self.routes {
            if !route.methods.has_method(method) || !route.pattern.matches(path) {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => route.pattern.specificity(&current.pattern).is_gt(),
            };
            if better {
                best = Some(route);
            }
        }

        let route = best?;
        let handler = route.methods.handler(method)?;
        let params = route.pattern.extract(path)?;
        Some(RouteMatch::new(handler, params, route.pattern.path()))
    }

    /// Methods registered on the most specific path matching `path`.
    ///
    /// Empty when nothing matches.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut best: Option<&Route<H>> = None;
        for route in &self.routes {
            if !route.pattern.matches(path) {
                continue;
            }
            if best.map_or(true, |current| {
                route.pattern.specificity(&current.pattern).is_gt()
            }) {
                best = Some(route);
            }
        }
        best.map(|route| route.methods.methods().cloned().collect())
            .unwrap_or_default()
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.iter()
    }

    /// Number of `(path, method)` registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handler_count
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handler_count == 0
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for route in &self.routes {
            let methods: Vec<&str> = route.methods.methods().map(Method::as_str).collect();
            list.entry(&format_args!("{} {:?}", route.pattern.path(), methods));
        }
        list.finish()
    }
}
