use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    handlers::{resolve_year, SeasonQuery},
    models::error::Error,
    utils::state::AppState,
};

pub async fn get_races(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeasonQuery>,
) -> Result<impl IntoResponse, Error> {
    let year = resolve_year(&state, params.year)?;
    Ok((StatusCode::OK, Json(state.stats.races(year).await)))
}

pub async fn get_race_results(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, Error> {
    let year = resolve_year(&state, Some(year))?;
    if round == 0 {
        return Err(Error::new(StatusCode::BAD_REQUEST, "round starts at 1"));
    }
    Ok((StatusCode::OK, Json(state.stats.race_results(year, round).await)))
}
