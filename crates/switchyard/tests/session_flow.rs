//! A session carried across requests through the public prelude.

use std::sync::Arc;

use bytes::Bytes;
use http::header;
use http_body_util::{BodyExt, Full};
use switchyard::prelude::*;

fn app(store: &Arc<SessionStore>) -> Dispatcher {
    let login_store = Arc::clone(store);
    App::new()
        .use_middleware(SessionMiddleware::new(Arc::clone(store)))
        .post("/login", move |req: Request| {
            let store = Arc::clone(&login_store);
            async move {
                let Some(session) = req.session() else {
                    return Response::internal_error();
                };
                match store.set_authorized(session.id(), true) {
                    Ok(_) => Response::text(StatusCode::OK, "welcome"),
                    Err(e) => DispatchError::from(e).into_response(),
                }
            }
        })
        .get("/private", |req: Request| async move {
            if req.session().is_some_and(Session::is_authorized) {
                Response::text(StatusCode::OK, "secret")
            } else {
                Response::error(StatusCode::UNAUTHORIZED, "Unauthorized")
            }
        })
        .build()
        .unwrap()
}

fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

#[tokio::test]
async fn login_authorizes_the_cookie_session() {
    let store = Arc::new(SessionStore::new());
    let dispatcher = app(&store);

    let response = dispatcher.dispatch(request(Method::GET, "/private", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let response = dispatcher
        .dispatch(request(Method::POST, "/login", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let response = dispatcher
        .dispatch(request(Method::GET, "/private", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, "secret");

    // A different client is not authorized.
    let response = dispatcher.dispatch(request(Method::GET, "/private", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.len(), 2);
}
