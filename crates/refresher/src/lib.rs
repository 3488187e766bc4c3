//! Scheduled job that publishes changed price targets.

pub mod job;
pub mod schedule;
pub mod symbols;

use chrono::Utc;
use ratings_client::{service_http_client, BotService, HistoryService, RealtimeService};
use ratings_core::{EnvKind, Environment, RatingsError};
use std::path::PathBuf;

pub use job::{RefreshOutcome, RefreshReport, Refresher};
pub use schedule::next_run_after;
pub use symbols::{load_symbols, parse_symbols};

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_uri: String,
    pub ratings_history_uri: String,
    pub realtime_uri: String,
    pub symbols_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, RatingsError> {
        let env = Environment::from_options(&[
            ("BOT_SERVICE_URI", EnvKind::String),
            ("RATINGS_HISTORY_SERVICE_URI", EnvKind::String),
            ("REALTIME_SERVICE_URI", EnvKind::String),
            ("REFRESHER_SYMBOLS_PATH", EnvKind::String),
        ])?;

        Ok(Self {
            bot_uri: env.require_str("BOT_SERVICE_URI")?,
            ratings_history_uri: env.require_str("RATINGS_HISTORY_SERVICE_URI")?,
            realtime_uri: env.require_str("REALTIME_SERVICE_URI")?,
            symbols_path: PathBuf::from(env.require_str("REFRESHER_SYMBOLS_PATH")?),
        })
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    ratings_core::telemetry::init_tracing("refresher");

    let config = Config::from_env().map_err(|e| {
        tracing::error!("unable to start up refresher: {}", e);
        e
    })?;

    // Fail fast on a bad symbols file; it is re-read before every pass.
    let symbols = load_symbols(&config.symbols_path).await?;
    tracing::info!("refresher watching {} symbol(s)", symbols.len());

    let client = service_http_client();
    let refresher = Refresher::new(
        RealtimeService::new(config.realtime_uri.clone(), client.clone()),
        BotService::new(config.bot_uri.clone(), client.clone()),
        HistoryService::new(config.ratings_history_uri.clone(), client),
    );

    let shutdown = ratings_http::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let now = Utc::now();
        let next = next_run_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!("next refresh at {}", next);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = &mut shutdown => break,
        }

        match load_symbols(&config.symbols_path).await {
            Ok(symbols) => {
                refresher.run_once(&symbols).await;
            }
            Err(e) => tracing::error!("skipping refresh pass: {}", e),
        }
    }

    tracing::info!("refresher shut down.");
    Ok(())
}
