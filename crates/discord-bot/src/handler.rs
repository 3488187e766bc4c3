use ratings_client::RealtimeService;
use ratings_core::Message as ChatMessage;
use serenity::{
    all::{ChannelType, CreateChannel, Guild, UnavailableGuild},
    async_trait,
    model::{channel::Message, gateway::Ready, id::ChannelId},
    prelude::*,
};

use crate::channels::{find_update_channel, ChannelRegistry, CHANNEL_NAME};
use crate::commands::{self, Command};
use crate::render;

pub struct Handler {
    realtime: RealtimeService,
    registry: ChannelRegistry,
}

impl Handler {
    pub fn new(realtime: RealtimeService, registry: ChannelRegistry) -> Self {
        Self { realtime, registry }
    }

    /// The reply for `command`, if it has one.
    pub async fn reply_to(&self, command: Command) -> Option<ChatMessage> {
        match command {
            Command::Help => Some(ChatMessage::help()),
            Command::RatingUsage => Some(ChatMessage::text("Usage: `pt!rating <TICKER>`")),
            Command::Rating(ticker) => match self.realtime.fetch(&ticker).await {
                Ok(data) => Some(ChatMessage::rating_update(&data)),
                Err(e) => {
                    tracing::error!("realtime lookup failed for {}: {}", ticker, e);
                    Some(ChatMessage::text(format!(
                        "Unable to get price targets for {} right now.",
                        ticker
                    )))
                }
            },
            Command::Unknown(name) => {
                tracing::warn!("unknown command: {}{}", commands::PREFIX, name);
                None
            }
        }
    }

    /// The guild's update channel, created with a welcome post when missing.
    async fn ensure_channel(&self, ctx: &Context, guild: &Guild) -> Result<ChannelId, serenity::Error> {
        let existing = find_update_channel(
            guild
                .channels
                .values()
                .map(|c| (c.id, c.name.as_str(), c.kind)),
        );
        if let Some(id) = existing {
            return Ok(id);
        }

        let channel = guild
            .id
            .create_channel(&ctx.http, CreateChannel::new(CHANNEL_NAME).kind(ChannelType::Text))
            .await?;
        tracing::info!("created #{} in guild {}", CHANNEL_NAME, guild.name);

        if let Err(e) = channel
            .id
            .send_message(&ctx.http, render::create_message(&ChatMessage::welcome()))
            .await
        {
            tracing::warn!("failed to post welcome message in guild {}: {}", guild.name, e);
        }

        Ok(channel.id)
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!("{} is connected and ready!", ready.user.name);
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        match self.ensure_channel(&ctx, &guild).await {
            Ok(channel) => {
                self.registry.register(guild.id, channel);
                tracing::info!("guild {} posts updates to channel {}", guild.name, channel);
            }
            Err(e) => {
                tracing::error!("unable to set up #{} in guild {}: {}", CHANNEL_NAME, guild.name, e);
            }
        }
    }

    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        // An outage also triggers this; keep the channel until the bot is removed.
        if !incomplete.unavailable {
            self.registry.forget(incomplete.id);
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(command) = commands::parse(&msg.content) else {
            return;
        };

        if let Some(reply) = self.reply_to(command).await {
            if let Err(e) = msg
                .channel_id
                .send_message(&ctx.http, render::create_message(&reply))
                .await
            {
                tracing::warn!("failed to reply in channel {}: {}", msg.channel_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use ratings_client::service_http_client;
    use ratings_core::{RatingSummary, RealtimeData, TickerQuote};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct SymbolQuery {
        symbol: String,
    }

    async fn realtime(Query(q): Query<SymbolQuery>) -> axum::response::Response {
        if q.symbol != "MSFT" {
            return StatusCode::BAD_GATEWAY.into_response();
        }
        Json(RealtimeData {
            rating: RatingSummary::default(),
            rating_history: RatingSummary::default(),
            ticker: TickerQuote {
                company_name: "Microsoft Corp".to_string(),
                price: 411.2,
                symbol: q.symbol,
            },
        })
        .into_response()
    }

    async fn handler() -> Handler {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/realtime", get(realtime)))
                .await
                .unwrap();
        });

        Handler::new(
            RealtimeService::new(format!("{}/realtime", base), service_http_client()),
            ChannelRegistry::new(),
        )
    }

    #[tokio::test]
    async fn test_reply_to_help_and_usage() {
        let handler = handler().await;

        assert_eq!(handler.reply_to(Command::Help).await, Some(ChatMessage::help()));
        assert_eq!(
            handler.reply_to(Command::RatingUsage).await,
            Some(ChatMessage::text("Usage: `pt!rating <TICKER>`"))
        );
        assert_eq!(handler.reply_to(Command::Unknown("price".to_string())).await, None);
    }

    #[tokio::test]
    async fn test_reply_to_rating() {
        let handler = handler().await;

        match handler.reply_to(Command::Rating("MSFT".to_string())).await {
            Some(ChatMessage::Embed { title, .. }) => assert_eq!(title, "Microsoft Corp (MSFT)"),
            other => panic!("expected rating embed, got {:?}", other),
        }

        assert_eq!(
            handler.reply_to(Command::Rating("ZZZZ".to_string())).await,
            Some(ChatMessage::text("Unable to get price targets for ZZZZ right now."))
        );
    }
}
