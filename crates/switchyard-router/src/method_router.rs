//! Per-path method table.
//!
//! [`MethodRouter`] maps HTTP methods to handlers for one declared path.
//! Every method on the path shares the path's compiled pattern.

use http::Method;

/// Maps HTTP methods to handlers for a single path.
///
/// # Example
///
/// ```rust
/// use switchyard_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new()
///     .get("index")
///     .post("submit");
///
/// assert_eq!(methods.handler(&Method::GET), Some(&"index"));
/// assert_eq!(methods.handler(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<H> {
    entries: Vec<(Method, H)>,
}

impl<H> Default for MethodRouter<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> MethodRouter<H> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `method`, returning the handler it replaced.
    pub fn insert(&mut self, method: Method, handler: H) -> Option<H> {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(m, _)| *m == method) {
            return Some(std::mem::replace(slot, handler));
        }
        self.entries.push((method, handler));
        None
    }

    /// Builder form of [`insert`](Self::insert) for an arbitrary method.
    #[must_use]
    pub fn on(mut self, method: Method, handler: H) -> Self {
        self.insert(method, handler);
        self
    }

    /// Registers a GET handler.
    #[must_use]
    pub fn get(self, handler: H) -> Self {
        self.on(Method::GET, handler)
    }

    /// Registers a POST handler.
    #[must_use]
    pub fn post(self, handler: H) -> Self {
        self.on(Method::POST, handler)
    }

    /// Registers a PUT handler.
    #[must_use]
    pub fn put(self, handler: H) -> Self {
        self.on(Method::PUT, handler)
    }

    /// Registers a DELETE handler.
    #[must_use]
    pub fn delete(self, handler: H) -> Self {
        self.on(Method::DELETE, handler)
    }

    /// Registers an OPTIONS handler.
    #[must_use]
    pub fn options(self, handler: H) -> Self {
        self.on(Method::OPTIONS, handler)
    }

    /// Registers a HEAD handler.
    #[must_use]
    pub fn head(self, handler: H) -> Self {
        self.on(Method::HEAD, handler)
    }

    /// Returns the handler bound to `method`.
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&H> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, h)| h)
    }

    /// Returns true if `method` has a handler.
    #[must_use]
    pub fn has_method(&self, method: &Method) -> bool {
        self.entries.iter().any(|(m, _)| m == method)
    }

    /// Methods with a handler, in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.entries.iter().map(|(m, _)| m)
    }

    /// Returns true if no method is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of bound methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<H> IntoIterator for MethodRouter<H> {
    type Item = (Method, H);
    type IntoIter = std::vec::IntoIter<(Method, H)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
