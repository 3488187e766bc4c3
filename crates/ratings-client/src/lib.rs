pub mod polygon;
pub mod provider;
pub mod services;
pub mod transport;

pub use polygon::{PolygonClient, SnapshotTicker, TickerDetails};
pub use provider::AnalystDataClient;
pub use services::{
    service_http_client, BotService, HistoryService, RatingsService, RealtimeService, TickerService,
};
pub use transport::{RateLimiter, Transport};
