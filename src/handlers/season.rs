use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{models::error::Error, utils::state::AppState};

#[derive(Debug, Deserialize)]
pub struct SelectSeason {
    pub year: i32,
}

pub async fn get_season(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"year": state.season.selected()})))
}

pub async fn set_season(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectSeason>,
) -> Result<impl IntoResponse, Error> {
    let year = state
        .season
        .select(payload.year)
        .map_err(|e| Error::new(StatusCode::BAD_REQUEST, &e))?;
    info!("Season selection changed to {year}");
    Ok((StatusCode::OK, Json(json!({"year": year}))))
}
