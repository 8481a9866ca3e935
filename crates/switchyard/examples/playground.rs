//! A small site exercising routing, sessions and default headers.
//!
//! ```text
//! cargo run -p switchyard --example playground
//! curl -i localhost:8080/users/42
//! ```
//!
//! Settings come from `switchyard.toml` if present, then `SWITCHYARD__*`
//! environment variables.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use switchyard::prelude::*;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
    name: &'static str,
    age: u32,
}

const HOME: &str = r#"
<h1>Home</h1>
<ul>
<li><a href="/data">Data</a></li>
<li><a href="/query?foo=bar&foo=test">Query test</a></li>
<li><a href="/return-struct">Return struct as json</a></li>
<li><a href="/test-post">Test POST</a></li>
<li><a href="/users/42">Path parameter</a></li>
<li><a href="/me">Session</a></li>
</ul>
"#;

const POST_FORM: &str = r#"
<main>
    <h1>Test POST</h1>
    <form action="/test-post" method="post">
        <input type="text" name="name" />
        <input type="submit" value="Submit" />
    </form>
</main>
"#;

async fn home(_req: Request) -> Response {
    Response::html(HOME)
}

async fn data(_req: Request) -> Response {
    Response::json_raw(r#"{"status": "ok"}"#)
}

async fn return_struct(_req: Request) -> Response {
    Response::json(&Person {
        name: "John",
        age: 30,
    })
}

async fn query(req: Request) -> Response {
    let map: BTreeMap<String, Vec<String>> = req.query_map();
    Response::json(&map)
}

async fn post_form(_req: Request) -> Response {
    Response::html(POST_FORM)
}

async fn post_greeting(req: Request) -> Response {
    let fields: BTreeMap<String, String> = form(req).await.unwrap_or_default();
    let name = fields.get("name").map_or("", String::as_str);
    Response::text(StatusCode::OK, format!("Hello {name}"))
}

async fn user(req: Request) -> Response {
    Response::json(&req.params().map(Params::to_map).unwrap_or_default())
}

async fn me(req: Request) -> Response {
    match req.session() {
        Some(session) => Response::json(&serde_json::json!({
            "id": session.id(),
            "authorized": session.is_authorized(),
        })),
        None => Response::internal_error(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::new()
        .with_development()
        .with_optional_file("switchyard.toml")?
        .with_dotenv()?
        .with_env_prefix("SWITCHYARD")
        .load()?;
    init_logging(&LogConfig::from(&config.logging))?;

    let store = Arc::new(SessionStore::new());
    let login_store = Arc::clone(&store);

    let dispatcher = App::new()
        .headers(DefaultHeaders::from(&config.headers))
        .use_middleware(session_stage(&config.session, Arc::clone(&store)))
        .use_middleware(LoggerMiddleware::new())
        .get("/", home)
        .get("/data", data)
        .get("/return-struct", return_struct)
        .get("/query", query)
        .get("/test-post", post_form)
        .post("/test-post", post_greeting)
        .get("/users/:id", user)
        .get("/me", me)
        .post("/login", move |req: Request| {
            let store = Arc::clone(&login_store);
            async move {
                let Some(session) = req.session() else {
                    return Response::internal_error();
                };
                match store.set_authorized(session.id(), true) {
                    Ok(_) => Response::redirect(StatusCode::SEE_OTHER, "/me"),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to authorize session");
                        DispatchError::from(e).into_response()
                    }
                }
            }
        })
        .build()?;

    Server::new(dispatcher)
        .with_config(ServerConfig::from(&config.server))
        .run()
        .await?;
    Ok(())
}
