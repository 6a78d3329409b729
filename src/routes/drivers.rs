use crate::{handlers::drivers::get_drivers, utils::state::AppState};
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn driver_routes() -> Router<Arc<AppState>> {
    Router::new().route("/drivers", get(get_drivers))
}
