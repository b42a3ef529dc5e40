use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;

use crate::{commands, AppState};

// POST /api/message
pub async fn post_message(State(state): State<AppState>, Json(req): Json<Value>) -> impl IntoResponse {
    let res = commands::dispatch_value(&state, req).await;
    (StatusCode::OK, Json(res))
}
