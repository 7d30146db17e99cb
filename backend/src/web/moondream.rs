use super::AppState;
use crate::logging::*;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use moonrelay_common::ErrorBody;
use serde_json::{Map, Value};
use std::sync::Arc;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/moondream/{operation}", post(relay))
}

// The browser posts without a content type, so the body is decoded by hand
// rather than through the `Json` extractor.
async fn relay(
    State(state): State<Arc<AppState>>,
    Path(operation): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let log = DEFAULT.new(o!(
        "function" => "relay",
        "operation" => operation.clone(),
    ));
    info!(log, "start"; "body_len" => body.len());

    let payload: Map<String, Value> = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            info!(log, "Failed to parse payload"; "error" => %err);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::from_error(&err).to_value()),
            );
        }
    };

    let res = state.moondream.relay(&operation, payload).await;
    (StatusCode::OK, Json(res))
}
