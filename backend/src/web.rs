mod basic;
mod moondream;


use crate::Result;
use crate::logging::*;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use moonrelay_common::config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Images arrive base64-encoded inside the JSON body.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

struct AppState {
    moondream: crate::moondream::Client,
}

pub async fn run() -> Result<()> {
    let log = DEFAULT.new(o!("function" => "web::run"));

    let state = Arc::new(AppState {
        moondream: crate::moondream::Client::new_default(),
    });
    let app = router(state);

    let addr = config::get("SERVER_ADDR")?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(log, "listening"; "addr" => &addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    add_routes(Router::new(), &[basic::add_route, moondream::add_route])
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
}

fn add_routes<T>(app: Router<T>, funcs: &[fn(Router<T>) -> Router<T>]) -> Router<T> {
    let mut app = app;
    for func in funcs {
        app = func(app);
    }
    app
}
