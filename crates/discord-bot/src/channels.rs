use async_trait::async_trait;
use dashmap::DashMap;
use ratings_core::Message as ChatMessage;
use serenity::http::Http;
use serenity::model::channel::ChannelType;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;

use crate::render;

/// Name of the text channel the bot posts rating updates to.
pub const CHANNEL_NAME: &str = "price-targets";

/// Update channel per guild, shared between the gateway handler and the
/// HTTP server.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: Arc<DashMap<GuildId, ChannelId>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, guild: GuildId, channel: ChannelId) {
        self.channels.insert(guild, channel);
    }

    pub fn forget(&self, guild: GuildId) {
        self.channels.remove(&guild);
    }

    pub fn channel_for(&self, guild: GuildId) -> Option<ChannelId> {
        self.channels.get(&guild).map(|entry| *entry.value())
    }

    pub fn channels(&self) -> Vec<ChannelId> {
        self.channels.iter().map(|entry| *entry.value()).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// The bot's text channel among `channels`, given as `(id, name, kind)`.
pub fn find_update_channel<'a, I>(channels: I) -> Option<ChannelId>
where
    I: IntoIterator<Item = (ChannelId, &'a str, ChannelType)>,
{
    channels
        .into_iter()
        .find(|(_, name, kind)| *kind == ChannelType::Text && *name == CHANNEL_NAME)
        .map(|(id, _, _)| id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Delivers one message to every registered update channel.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    fn channel_count(&self) -> usize;

    async fn broadcast(&self, message: &ChatMessage) -> BroadcastReport;
}

pub struct DiscordBroadcaster {
    http: Arc<Http>,
    registry: ChannelRegistry,
}

impl DiscordBroadcaster {
    pub fn new(http: Arc<Http>, registry: ChannelRegistry) -> Self {
        Self { http, registry }
    }
}

#[async_trait]
impl Broadcaster for DiscordBroadcaster {
    fn channel_count(&self) -> usize {
        self.registry.len()
    }

    async fn broadcast(&self, message: &ChatMessage) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for channel in self.registry.channels() {
            match channel
                .send_message(&self.http, render::create_message(message))
                .await
            {
                Ok(_) => report.sent += 1,
                Err(e) => {
                    tracing::warn!("failed to send update to channel {}: {}", channel, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
