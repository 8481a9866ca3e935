//! Nesting order and short-circuit behaviour of composed chains.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use switchyard_middleware::{
    BoxFuture, BoxedHandler, BoxedMiddleware, Chain, Handler, Middleware, Next, Request, Response,
    ResponseExt,
};

type Log = Arc<Mutex<Vec<String>>>;

/// Records entry and exit, optionally refusing to continue.
struct Recorder {
    label: &'static str,
    log: Log,
    stop: bool,
}

impl Middleware for Recorder {
    fn name(&self) -> &'static str {
        self.label
    }

    fn process<'a>(&'a self, request: Request, next: Next) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            self.log.lock().unwrap().push(format!("{}-pre", self.label));
            if self.stop {
                self.log.lock().unwrap().push(format!("{}-stop", self.label));
                return Response::error(StatusCode::UNAUTHORIZED, "stopped");
            }
            let response = next.run(request).await;
            self.log.lock().unwrap().push(format!("{}-post", self.label));
            response
        })
    }
}

fn recorder(label: &'static str, log: &Log, stop: bool) -> BoxedMiddleware {
    Arc::new(Recorder {
        label,
        log: Arc::clone(log),
        stop,
    })
}

fn handler(log: &Log) -> BoxedHandler {
    let log = Arc::clone(log);
    Arc::new(move |_req: Request| {
        log.lock().unwrap().push("H".to_string());
        async { Response::text(StatusCode::OK, "done") }
    })
}

fn request() -> Request {
    http::Request::new(Full::new(Bytes::new()))
}

#[tokio::test]
async fn declared_first_runs_outermost() {
    let log: Log = Arc::default();
    let chain = Chain::compose(
        &[
            recorder("A", &log, false),
            recorder("B", &log, false),
            recorder("C", &log, false),
        ],
        handler(&log),
    );

    let response = chain.call(request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["A-pre", "B-pre", "C-pre", "H", "C-post", "B-post", "A-post"]
    );
}

#[tokio::test]
async fn short_circuit_skips_inner_stages() {
    let log: Log = Arc::default();
    let chain = Chain::compose(
        &[
            recorder("A", &log, false),
            recorder("B", &log, true),
            recorder("C", &log, false),
        ],
        handler(&log),
    );

    let response = chain.call(request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["A-pre", "B-pre", "B-stop", "A-post"]
    );
}

#[tokio::test]
async fn each_request_runs_the_full_chain() {
    let log: Log = Arc::default();
    let chain = Chain::compose(&[recorder("A", &log, false)], handler(&log));

    chain.call(request()).await;
    chain.call(request()).await;

    assert_eq!(
        *log.lock().unwrap(),
        vec!["A-pre", "H", "A-post", "A-pre", "H", "A-post"]
    );
}
