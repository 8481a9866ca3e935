//! Full dispatch path: default headers, session stage, logger, routing.

use std::sync::Arc;

use bytes::Bytes;
use http::{header, Method, StatusCode};
use http_body_util::{BodyExt, Full};
use switchyard_middleware::{
    LoggerMiddleware, Request, RequestExt, Response, ResponseExt, SessionMiddleware,
};
use switchyard_server::{App, DefaultHeaders, Dispatcher};
use switchyard_session::SessionStore;

fn app(store: &Arc<SessionStore>) -> Dispatcher {
    App::new()
        .headers(DefaultHeaders::permissive_html())
        .use_middleware(SessionMiddleware::new(Arc::clone(store)))
        .use_middleware(LoggerMiddleware::new())
        .get("/users/:id", |req: Request| async move {
            let params = req.params().map(|p| p.to_map()).unwrap_or_default();
            Response::json(&params)
        })
        .get("/users/new", |_req: Request| async { Response::html("<form></form>") })
        .get("/whoami", |req: Request| async move {
            let id = req.session().map(|s| s.id().to_string()).unwrap_or_default();
            Response::text(StatusCode::OK, id)
        })
        .build()
        .unwrap()
}

fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn body(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn session_token(response: &Response) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let token = value.strip_prefix("session=")?.split(';').next()?;
    Some(token.to_string())
}

fn is_base64_token(token: &str) -> bool {
    let (head, tail) = token.split_at(token.len().min(43));
    head.len() == 43
        && head
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
        && (tail.is_empty() || tail == "=")
}

#[tokio::test]
async fn path_parameter_round_trip() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);

    let response = dispatcher.dispatch(get("/users/42")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let value: serde_json::Value = serde_json::from_slice(&body(response).await).unwrap();
    assert_eq!(value, serde_json::json!({"id": "42"}));
}

#[tokio::test]
async fn segment_count_mismatch_is_not_found() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);

    for uri in ["/users/42/extra", "/users", "/users/42/"] {
        let response = dispatcher.dispatch(get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body(response).await, "Not found");
    }
}

#[tokio::test]
async fn literal_route_beats_parameter() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);

    let response = dispatcher.dispatch(get("/users/new")).await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(body(response).await, "<form></form>");
}

#[tokio::test]
async fn missing_cookie_issues_session() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);

    let response = dispatcher.dispatch(get("/whoami")).await;
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.ends_with("; Path=/; HttpOnly"), "{set_cookie}");

    let token = session_token(&response).unwrap();
    assert!(is_base64_token(&token), "{token}");
    assert!(store.contains(&token));
    assert_eq!(body(response).await, token.as_str());
}

#[tokio::test]
async fn known_cookie_reuses_session() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);
    let existing = store.create_session().unwrap();

    let cookie = format!("theme=dark; session={}", existing.id());
    let response = dispatcher.dispatch(get_with_cookie("/whoami", &cookie)).await;

    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body(response).await, existing.id());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn unknown_cookie_is_replaced() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);

    let response = dispatcher
        .dispatch(get_with_cookie("/whoami", "session=forged"))
        .await;

    let token = session_token(&response).unwrap();
    assert_ne!(token, "forged");
    assert!(!store.contains("forged"));
    assert!(store.contains(&token));
}

#[tokio::test]
async fn not_found_still_gets_a_session() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);

    let response = dispatcher.dispatch(get("/nowhere")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(session_token(&response).is_some());
    assert_eq!(store.len(), 1);
}
