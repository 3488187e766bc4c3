//! Price Targets Discord bot: `pt!` commands plus the `/bot` update endpoint.

pub mod channels;
pub mod commands;
pub mod handler;
pub mod render;
pub mod server;

use axum::Router;
use ratings_client::{service_http_client, RealtimeService};
use ratings_core::{EnvKind, Environment, RatingsError};
use serenity::prelude::*;
use std::sync::Arc;

use channels::{ChannelRegistry, DiscordBroadcaster};
use handler::Handler;
use server::AppState;

pub fn router(state: AppState) -> Router {
    server::bot_routes().with_state(state)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub discord_token: String,
    pub realtime_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, RatingsError> {
        let env = Environment::from_options(&[
            ("BOT_SERVER_PORT", EnvKind::Int),
            ("DISCORD_BOT_TOKEN", EnvKind::String),
            ("REALTIME_SERVICE_URI", EnvKind::String),
        ])?;

        Ok(Self {
            port: env.port("BOT_SERVER_PORT")?,
            discord_token: env.require_str("DISCORD_BOT_TOKEN")?,
            realtime_uri: env.require_str("REALTIME_SERVICE_URI")?,
        })
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    ratings_core::telemetry::init_tracing("discord_bot");

    let config = Config::from_env().map_err(|e| {
        tracing::error!("unable to start up discord bot: {}", e);
        e
    })?;

    let registry = ChannelRegistry::new();
    let handler = Handler::new(
        RealtimeService::new(config.realtime_uri.clone(), service_http_client()),
        registry.clone(),
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await?;

    let state = AppState {
        broadcaster: Arc::new(DiscordBroadcaster::new(client.http.clone(), registry)),
    };
    let mut server = tokio::spawn(ratings_http::serve(router(state), config.port, "bot server"));

    tracing::info!("Discord bot starting...");

    // Graceful shutdown: SIGINT + SIGTERM
    let shard_manager = client.shard_manager.clone();

    tokio::select! {
        result = client.start() => {
            if let Err(e) = result {
                tracing::error!("Discord client error: {}", e);
            }
        }
        result = &mut server => {
            match result {
                Ok(Err(e)) => tracing::error!("bot server error: {}", e),
                Err(e) => tracing::error!("bot server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
        _ = ratings_http::shutdown_signal() => {}
    }

    shard_manager.shutdown_all().await;
    server.abort();
    tracing::info!("Discord bot shut down.");

    Ok(())
}
