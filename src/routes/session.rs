use crate::{handlers::session::get_sessions, utils::state::AppState};
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/sessions", get(get_sessions))
}
