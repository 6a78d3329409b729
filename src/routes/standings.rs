use crate::{
    handlers::standings::{championship, constructor_standings, driver_standings},
    utils::state::AppState,
};
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn standings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(driver_standings))
        .route("/constructors", get(constructor_standings))
        .route("/championship", get(championship))
}
