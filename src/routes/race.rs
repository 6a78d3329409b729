use crate::{
    handlers::race::{get_race_results, get_races},
    utils::state::AppState,
};
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn race_routes() -> Router<Arc<AppState>> {
    Router::new().route("/races", get(get_races))
}

pub fn result_routes() -> Router<Arc<AppState>> {
    Router::new().route("/results/{year}/{round}", get(get_race_results))
}
