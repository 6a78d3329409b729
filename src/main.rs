use std::{error::Error, sync::Arc};

use axum::serve;
use f1_stats::{
    routes::{init_tracing, make_app},
    utils::{config::Config, state::AppState},
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Initializing application...");
    let config = Config::init();
    info!("Configuration loaded successfully");

    let state = Arc::new(AppState::init(config));

    let mut season_changes = state.season.subscribe();
    tokio::spawn(async move {
        while season_changes.changed().await.is_ok() {
            let year = *season_changes.borrow_and_update();
            info!("Now serving season {year}");
        }
    });

    let app = make_app(state.clone());

    let listener = TcpListener::bind(&state.config.bind_addr).await?;
    info!("Listening on http://{}", state.config.bind_addr);
    serve(listener, app).await?;
    Ok(())
}
