//! Session tracking middleware.
//!
//! Every request leaves this stage with a [`Session`] in its extensions.
//!
//! | Cookie sent            | Session used           | `Set-Cookie` emitted |
//! |------------------------|------------------------|----------------------|
//! | none                   | newly created          | yes                  |
//! | known token            | the stored session     | no                   |
//! | unknown token          | newly created          | yes, new token       |
//!
//! The stage never rejects a request for lacking a session. Store failures
//! answer `500 Internal server error` without running the rest of the chain.

use std::sync::Arc;

use http::header;
use switchyard_session::{Session, SessionResult, SessionStore};

use crate::cookie::{SameSite, SetCookie};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::request_ext::RequestExt;
use crate::types::{Request, Response, ResponseExt};

/// Default name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Attaches a session to every request.
#[derive(Debug, Clone)]
pub struct SessionMiddleware {
    store: Arc<SessionStore>,
    cookie_name: String,
    secure: bool,
    same_site: Option<SameSite>,
}

impl SessionMiddleware {
    /// Creates the stage over a shared store, using the `session` cookie.
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            cookie_name: SESSION_COOKIE.to_string(),
            secure: false,
            same_site: None,
        }
    }

    /// Uses a different cookie name.
    #[must_use]
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Adds the `Secure` flag to issued cookies.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Adds a `SameSite` attribute to issued cookies.
    #[must_use]
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// The store sessions are drawn from.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Resolves the session for a presented token.
    ///
    /// The flag is true when the client must be sent a new cookie.
    fn resolve(&self, presented: Option<&str>) -> SessionResult<(Session, bool)> {
        match presented {
            None => Ok((self.store.create_session()?, true)),
            Some(token) => {
                let session = self.store.get_or_create_session(token)?;
                let issue = session.id() != token;
                Ok((session, issue))
            }
        }
    }

    fn cookie_for(&self, session: &Session) -> SetCookie {
        let cookie = SetCookie::new(self.cookie_name.as_str(), session.id())
            .path("/")
            .http_only(true)
            .secure(self.secure);
        match self.same_site {
            Some(same_site) => cookie.same_site(same_site),
            None => cookie,
        }
    }
}

impl Middleware for SessionMiddleware {
    fn name(&self) -> &'static str {
        "session"
    }

    fn process<'a>(&'a self, mut request: Request, next: Next) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let cookies = request.cookies();
            let (session, issue) = match self.resolve(cookies.get(&self.cookie_name)) {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to resolve session");
                    return Response::internal_error();
                }
            };

            tracing::debug!(new_cookie = issue, authorized = session.is_authorized(), "Session resolved");

            let set_cookie = issue.then(|| self.cookie_for(&session));
            request.extensions_mut().insert(session);

            let mut response = next.run(request).await;

            if let Some(cookie) = set_cookie {
                match cookie.to_header_value() {
                    Some(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                    None => {
                        tracing::error!(cookie = %self.cookie_name, "Session cookie is not a valid header value");
                    }
                }
            }
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use switchyard_session::{is_well_formed, TokenSource};

    use crate::middleware::BoxedHandler;

    fn request(cookie: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    /// Echoes the attached session id in a header.
    fn echo() -> BoxedHandler {
        Arc::new(|req: Request| async move {
            let id = req.session().map(|s| s.id().to_string()).unwrap_or_default();
            let mut response = Response::text(StatusCode::OK, "");
            response
                .headers_mut()
                .insert("x-session", http::HeaderValue::from_str(&id).unwrap());
            response
        })
    }

    fn set_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_no_cookie_issues_session() {
        let store = Arc::new(SessionStore::new());
        let stage = SessionMiddleware::new(Arc::clone(&store));

        let response = stage.process(request(None), Next::new(echo())).await;
        let id = response.headers()["x-session"].to_str().unwrap().to_string();

        assert!(is_well_formed(&id));
        assert!(store.contains(&id));
        assert_eq!(
            set_cookie(&response),
            Some(format!("session={id}; Path=/; HttpOnly"))
        );
    }

    #[tokio::test]
    async fn test_known_cookie_reuses_session() {
        let store = Arc::new(SessionStore::new());
        let existing = store.create_session().unwrap();
        let stage = SessionMiddleware::new(Arc::clone(&store));

        let cookie = format!("session={}", existing.id());
        let response = stage.process(request(Some(&cookie)), Next::new(echo())).await;

        assert_eq!(response.headers()["x-session"], existing.id());
        assert!(set_cookie(&response).is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_cookie_replaced() {
        let store = Arc::new(SessionStore::new());
        let stage = SessionMiddleware::new(Arc::clone(&store));

        let response = stage
            .process(request(Some("session=forged")), Next::new(echo()))
            .await;
        let id = response.headers()["x-session"].to_str().unwrap().to_string();

        assert_ne!(id, "forged");
        assert!(set_cookie(&response).unwrap().starts_with(&format!("session={id};")));
    }

    #[tokio::test]
    async fn test_custom_cookie_attributes() {
        let store = Arc::new(SessionStore::new());
        let stage = SessionMiddleware::new(store)
            .cookie_name("sid")
            .secure(true)
            .same_site(SameSite::Strict);

        let response = stage.process(request(None), Next::new(echo())).await;
        let cookie = set_cookie(&response).unwrap();

        assert!(cookie.starts_with("sid="));
        assert!(cookie.ends_with("; Path=/; HttpOnly; Secure; SameSite=Strict"));
    }

    struct Exhausted;

    impl TokenSource for Exhausted {
        fn fill(&self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no entropy",
            )))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let store = Arc::new(SessionStore::with_token_source(Arc::new(Exhausted)));
        let stage = SessionMiddleware::new(store);

        let response = stage.process(request(None), Next::new(echo())).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get("x-session").is_none());
    }
}
