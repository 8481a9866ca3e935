//! Accessors for per-request data.
//!
//! The server and the built-in stages store what they learn about a request
//! in its extensions: the peer address, the bound path parameters and the
//! resolved session. [`RequestExt`] reads them back.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use switchyard_router::Params;
use switchyard_session::Session;

use crate::cookie::Cookies;
use crate::types::Request;

/// Address of the connected peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr(pub SocketAddr);

/// Read access to request extensions and the query string.
pub trait RequestExt {
    /// Path parameters bound by the matched route.
    fn params(&self) -> Option<&Params>;

    /// A single path parameter.
    fn param(&self, name: &str) -> Option<&str> {
        self.params().and_then(|p| p.get(name))
    }

    /// The session attached by the session middleware.
    fn session(&self) -> Option<&Session>;

    /// The peer address recorded by the server.
    fn remote_addr(&self) -> Option<SocketAddr>;

    /// Cookies sent with the request.
    fn cookies(&self) -> Cookies;

    /// Deserializes the query string.
    ///
    /// A missing query string deserializes as empty.
    fn query<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error>;

    /// The query string grouped by key, values in order of appearance.
    ///
    /// `?foo=bar&foo=test` yields `{"foo": ["bar", "test"]}`. A malformed
    /// query string yields an empty map.
    fn query_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in self.query::<Vec<(String, String)>>().unwrap_or_default() {
            map.entry(key).or_default().push(value);
        }
        map
    }
}

impl<B> RequestExt for http::Request<B> {
    fn params(&self) -> Option<&Params> {
        self.extensions().get::<Params>()
    }

    fn session(&self) -> Option<&Session> {
        self.extensions().get::<Session>()
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions().get::<RemoteAddr>().map(|addr| addr.0)
    }

    fn cookies(&self) -> Cookies {
        Cookies::from_headers(self.headers())
    }

    fn query<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.uri().query().unwrap_or(""))
    }
}

/// Consumes the request and returns its body.
pub async fn body_bytes(request: Request) -> Bytes {
    match request.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    }
}

/// Consumes the request and deserializes an `application/x-www-form-urlencoded` body.
pub async fn form<T: DeserializeOwned>(request: Request) -> Result<T, serde_urlencoded::de::Error> {
    let body = body_bytes(request).await;
    serde_urlencoded::from_bytes(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use serde::Deserialize;

    fn request(uri: &str) -> Request {
        http::Request::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_missing_extensions() {
        let req = request("/");
        assert!(req.params().is_none());
        assert!(req.param("id").is_none());
        assert!(req.session().is_none());
        assert!(req.remote_addr().is_none());
    }

    #[test]
    fn test_params_from_extensions() {
        let mut req = request("/users/42");
        let mut params = Params::new();
        params.push("id", "42");
        req.extensions_mut().insert(params);

        assert_eq!(req.param("id"), Some("42"));
    }

    #[test]
    fn test_remote_addr() {
        let mut req = request("/");
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        req.extensions_mut().insert(RemoteAddr(addr));
        assert_eq!(req.remote_addr(), Some(addr));
    }

    #[test]
    fn test_query_map_groups_repeated_keys() {
        let req = request("/query?foo=bar&foo=test&x=a%20b");
        let map = req.query_map();

        assert_eq!(map["foo"], vec!["bar", "test"]);
        assert_eq!(map["x"], vec!["a b"]);
    }

    #[test]
    fn test_query_map_without_query() {
        assert!(request("/query").query_map().is_empty());
    }

    #[test]
    fn test_typed_query() {
        #[derive(Deserialize)]
        struct Page {
            page: u32,
        }

        let page: Page = request("/list?page=3").query().unwrap();
        assert_eq!(page.page, 3);
        assert!(request("/list?page=x").query::<Page>().is_err());
    }

    #[tokio::test]
    async fn test_form_body() {
        #[derive(Deserialize)]
        struct Greeting {
            name: String,
        }

        let req = http::Request::builder()
            .method("POST")
            .uri("/test-post")
            .body(Full::new(Bytes::from_static(b"name=Ada+Lovelace")))
            .unwrap();

        let greeting: Greeting = form(req).await.unwrap();
        assert_eq!(greeting.name, "Ada Lovelace");
    }
}
