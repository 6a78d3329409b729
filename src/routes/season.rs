use crate::{
    handlers::season::{get_season, set_season},
    utils::state::AppState,
};
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn season_routes() -> Router<Arc<AppState>> {
    Router::new().route("/season", get(get_season).put(set_season))
}
