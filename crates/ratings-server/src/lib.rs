//! Ratings service: summarizes analyst price targets for a ticker.

pub mod config;
pub mod routes;

use axum::Router;
use ratings_client::AnalystDataClient;
use ratings_core::RatingAggregator;

pub use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub provider: AnalystDataClient,
    pub aggregator: RatingAggregator,
}

pub fn router(state: AppState) -> Router {
    routes::rating_routes().with_state(state)
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    ratings_core::telemetry::init_tracing("ratings_server");

    let config = Config::from_env().map_err(|e| {
        tracing::error!("unable to start up ratings server: {}", e);
        e
    })?;
    tracing::info!("aggregating ratings with policy {}", config.policy);

    let state = AppState {
        provider: AnalystDataClient::new(config.request_url.clone()),
        aggregator: RatingAggregator::new(config.policy),
    };

    ratings_http::serve(router(state), config.port, "ratings server").await
}
