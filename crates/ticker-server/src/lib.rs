//! Ticker service: company name and latest price for a symbol.

pub mod routes;

use axum::Router;
use ratings_client::PolygonClient;
use ratings_core::{EnvKind, Environment, RatingsError};

#[derive(Clone)]
pub struct AppState {
    pub polygon: PolygonClient,
}

pub fn router(state: AppState) -> Router {
    routes::ticker_routes().with_state(state)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub polygon_api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, RatingsError> {
        let env = Environment::from_options(&[
            ("TICKER_SERVER_PORT", EnvKind::Int),
            ("POLYGON_API_KEY", EnvKind::String),
        ])?;

        Ok(Self {
            port: env.port("TICKER_SERVER_PORT")?,
            polygon_api_key: env.require_str("POLYGON_API_KEY")?,
        })
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    ratings_core::telemetry::init_tracing("ticker_server");

    let config = Config::from_env().map_err(|e| {
        tracing::error!("unable to start up ticker server: {}", e);
        e
    })?;

    let state = AppState {
        polygon: PolygonClient::new(config.polygon_api_key),
    };

    ratings_http::serve(router(state), config.port, "ticker server").await
}
