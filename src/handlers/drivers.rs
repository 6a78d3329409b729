use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    handlers::{resolve_year, SeasonQuery},
    models::error::Error,
    utils::state::AppState,
};

pub async fn get_drivers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeasonQuery>,
) -> Result<impl IntoResponse, Error> {
    let year = resolve_year(&state, params.year)?;
    let drivers = state.stats.drivers(year).await;
    Ok((StatusCode::OK, Json(drivers)))
}
