//! Realtime service: current ratings, stored history and quote in one call.

pub mod config;
pub mod routes;

use axum::Router;
use ratings_client::{service_http_client, HistoryService, RatingsService, TickerService};

pub use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub ratings: RatingsService,
    pub history: HistoryService,
    pub ticker: TickerService,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let client = service_http_client();
        Self {
            ratings: RatingsService::new(config.ratings_uri.clone(), client.clone()),
            history: HistoryService::new(config.ratings_history_uri.clone(), client.clone()),
            ticker: TickerService::new(config.ticker_uri.clone(), client),
        }
    }
}

pub fn router(state: AppState) -> Router {
    routes::realtime_routes().with_state(state)
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    ratings_core::telemetry::init_tracing("realtime_server");

    let config = Config::from_env().map_err(|e| {
        tracing::error!("unable to start up realtime server: {}", e);
        e
    })?;

    let state = AppState::from_config(&config);
    ratings_http::serve(router(state), config.port, "realtime server").await
}
