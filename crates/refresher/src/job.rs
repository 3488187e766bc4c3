use ratings_client::{BotService, HistoryService, RealtimeService};
use ratings_core::{Message, RatingsError};
use std::time::Duration;

/// What happened to one symbol during a refresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Unchanged,
    Published { bot_reply: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub published: usize,
    pub unchanged: usize,
    pub failed: Vec<String>,
}

/// Pushes changed ratings to the bot and records them as history.
#[derive(Clone)]
pub struct Refresher {
    realtime: RealtimeService,
    bot: BotService,
    history: HistoryService,
    pause: Duration,
}

impl Refresher {
    pub fn new(realtime: RealtimeService, bot: BotService, history: HistoryService) -> Self {
        Self {
            realtime,
            bot,
            history,
            pause: Duration::from_secs(1),
        }
    }

    /// Delay between symbols within one pass.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub async fn refresh_symbol(&self, symbol: &str) -> Result<RefreshOutcome, RatingsError> {
        let data = self.realtime.fetch(symbol).await?;

        if !data.has_changed() {
            tracing::info!("no rating change for {}, skipping", symbol);
            return Ok(RefreshOutcome::Unchanged);
        }

        tracing::info!("{}", Message::summary_line(symbol, &data.rating));
        let bot_reply = self.bot.publish(&data).await?;
        tracing::info!("bot: {}", bot_reply);

        self.history.record(symbol, &data.rating).await?;
        Ok(RefreshOutcome::Published { bot_reply })
    }

    /// Refresh every symbol in order. A failing symbol is logged and the
    /// pass moves on.
    pub async fn run_once(&self, symbols: &[String]) -> RefreshReport {
        let mut report = RefreshReport::default();

        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            match self.refresh_symbol(symbol).await {
                Ok(RefreshOutcome::Unchanged) => report.unchanged += 1,
                Ok(RefreshOutcome::Published { .. }) => report.published += 1,
                Err(e) => {
                    tracing::error!("failed to refresh {}: {}", symbol, e);
                    report.failed.push(symbol.clone());
                }
            }
        }

        tracing::info!(
            "refresh pass done: {} published, {} unchanged, {} failed",
            report.published,
            report.unchanged,
            report.failed.len()
        );
        report
    }
}
