mod api;
mod dto;
mod state;

use crate::state::AppState;
use bus_routes::feed::Feed;
use std::{sync::Arc, time::Instant};
use tracing::{error, info};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        error!("Missing gtfs zip");
        std::process::exit(1);
    }
    let port = match std::env::var("PORT") {
        Ok(value) => match value.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                error!("Invalid PORT {value}");
                std::process::exit(1);
            }
        },
        Err(_) => DEFAULT_PORT,
    };

    info!("Loading stops...");
    let now = Instant::now();
    let stops = match Feed::from_zip(&args[1]).stops() {
        Ok(stops) => stops,
        Err(err) => {
            error!("Failed to load stops from {}: {err}", args[1]);
            std::process::exit(1);
        }
    };
    let state = Arc::new(AppState::new(stops));
    info!("Loading stops took {:?}", now.elapsed());

    let app = api::router(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {port}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
        std::process::exit(1);
    }
}
