//! Ratings history service: last published rating summary per symbol.

pub mod db;
pub mod routes;

use axum::Router;
use ratings_core::{EnvKind, Environment, RatingsError};

pub use db::{HistoryDb, HistoryEntry};

#[derive(Clone)]
pub struct AppState {
    pub db: HistoryDb,
}

pub fn router(state: AppState) -> Router {
    routes::history_routes().with_state(state)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, RatingsError> {
        let env = Environment::from_options(&[
            ("RATINGS_HISTORY_SERVER_PORT", EnvKind::Int),
            ("DATABASE_URL", EnvKind::String),
        ])?;

        Ok(Self {
            port: env.port("RATINGS_HISTORY_SERVER_PORT")?,
            database_url: env.require_str("DATABASE_URL")?,
        })
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    ratings_core::telemetry::init_tracing("ratings_history");

    let config = Config::from_env().map_err(|e| {
        tracing::error!("unable to start up ratings history server: {}", e);
        e
    })?;

    let db = HistoryDb::new(&config.database_url).await?;
    tracing::info!("rating history database ready");

    ratings_http::serve(router(AppState { db }), config.port, "ratings history server").await
}
