pub mod drivers;
pub mod race;
pub mod season;
pub mod session;
pub mod standings;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::{
    handlers::{cache::flush_cache, statistics::get_statistics},
    routes::{
        drivers::driver_routes,
        race::{race_routes, result_routes},
        season::season_routes,
        session::session_routes,
        standings::standings_routes,
    },
    utils::state::AppState,
};

/// Installs the fmt subscriber. `LOG_LEVEL` governs this crate's own
/// targets; request traces from tower-http are always on.
pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|l| l.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let filter = filter::Targets::new()
        .with_target("tower_http::trace::on_response", Level::TRACE)
        .with_target("tower_http::trace::on_request", Level::TRACE)
        .with_target("tower_http::trace::make_span", Level::DEBUG)
        .with_target("axum::rejection", Level::TRACE)
        .with_target(env!("CARGO_PKG_NAME"), level)
        .with_default(Level::INFO);

    // A subscriber may already be installed when embedded or under test.
    let _ = Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}

pub fn make_app(state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/", get(health_check))
        .merge(season_routes())
        .merge(driver_routes())
        .merge(race_routes())
        .merge(result_routes())
        .merge(session_routes())
        .nest("/standings", standings_routes())
        .route("/statistics", get(get_statistics))
        .route("/cache/flush", post(flush_cache))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    info!("Application initialized successfully");
    app
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"message": "Hello World"}))).into_response()
}
