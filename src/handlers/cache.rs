use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::utils::state::AppState;

pub async fn flush_cache(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.stats.flush();
    (StatusCode::OK, Json(json!({"flushed": true})))
}
