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

pub async fn driver_standings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeasonQuery>,
) -> Result<impl IntoResponse, Error> {
    let year = resolve_year(&state, params.year)?;
    Ok((StatusCode::OK, Json(state.stats.driver_standings(year).await)))
}

pub async fn constructor_standings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeasonQuery>,
) -> Result<impl IntoResponse, Error> {
    let year = resolve_year(&state, params.year)?;
    Ok((StatusCode::OK, Json(state.stats.constructor_standings(year).await)))
}

pub async fn championship(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeasonQuery>,
) -> Result<impl IntoResponse, Error> {
    let year = resolve_year(&state, params.year)?;
    Ok((StatusCode::OK, Json(state.stats.championship(year).await)))
}
