use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{handlers::resolve_year, models::error::Error, utils::state::AppState};

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub year: Option<i32>,
    pub session_name: Option<String>,
}

pub async fn get_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionQuery>,
) -> Result<impl IntoResponse, Error> {
    let year = resolve_year(&state, params.year)?;
    let session_name = params
        .session_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let sessions = state.stats.sessions(year, session_name).await;
    Ok((StatusCode::OK, Json(sessions)))
}
