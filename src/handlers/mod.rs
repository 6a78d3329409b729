pub mod cache;
pub mod drivers;
pub mod race;
pub mod season;
pub mod session;
pub mod standings;
pub mod statistics;

use axum::http::StatusCode;
use serde::Deserialize;

use crate::{
    models::error::Error,
    utils::{season::validate_season, state::AppState},
};

#[derive(Debug, Default, Deserialize)]
pub struct SeasonQuery {
    pub year: Option<i32>,
}

/// The requested year, or the selected season when none was given.
pub fn resolve_year(state: &AppState, year: Option<i32>) -> Result<i32, Error> {
    match year {
        Some(year) => {
            validate_season(year).map_err(|e| Error::new(StatusCode::BAD_REQUEST, &e))
        }
        None => Ok(state.season.selected()),
    }
}
