use ratings_core::{validate_symbol, RatingsError, TickerQuote};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::transport::{ensure_success, Transport};

const BASE_URL: &str = "https://api.polygon.io";

#[derive(Clone)]
pub struct PolygonClient {
    api_key: String,
    base_url: String,
    transport: Transport,
}

impl PolygonClient {
    pub fn new(api_key: String) -> Self {
        // Default 500 req/min for Starter plan. Free tier users should set POLYGON_RATE_LIMIT=5.
        let rate_limit: usize = std::env::var("POLYGON_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            transport: Transport::new(Duration::from_secs(90), rate_limit),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get ticker details
    pub async fn get_ticker_details(&self, symbol: &str) -> Result<TickerDetails, RatingsError> {
        validate_symbol(symbol)?;
        let url = format!("{}/v3/reference/tickers/{}", self.base_url, symbol);

        let response = self
            .transport
            .send(self.transport.client().get(&url).query(&[("apiKey", &self.api_key)]))
            .await?;
        let response = ensure_success(response).await?;

        let details_response: TickerDetailsResponse = response
            .json()
            .await
            .map_err(|e| RatingsError::ApiError(e.to_string()))?;

        Ok(details_response.results)
    }

    /// Get snapshot for a ticker (last trade, today's bar, prev day)
    pub async fn get_snapshot(&self, symbol: &str) -> Result<SnapshotTicker, RatingsError> {
        validate_symbol(symbol)?;
        let url = format!(
            "{}/v2/snapshot/locale/us/markets/stocks/tickers/{}",
            self.base_url, symbol
        );

        let response = self
            .transport
            .send(self.transport.client().get(&url).query(&[("apiKey", &self.api_key)]))
            .await?;
        let response = ensure_success(response).await?;

        let snap_response: SnapshotResponse = response
            .json()
            .await
            .map_err(|e| RatingsError::ApiError(e.to_string()))?;

        Ok(snap_response.ticker)
    }

    /// Company name plus latest price for `symbol`.
    pub async fn get_quote(&self, symbol: &str) -> Result<TickerQuote, RatingsError> {
        let symbol = symbol.to_uppercase();
        let (details, snapshot) =
            tokio::try_join!(self.get_ticker_details(&symbol), self.get_snapshot(&symbol))?;

        let price = snapshot
            .latest_price()
            .ok_or_else(|| RatingsError::InvalidData(format!("no price available for {}", symbol)))?;

        Ok(TickerQuote {
            company_name: details.name,
            price,
            symbol: details.ticker,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TickerDetailsResponse {
    results: TickerDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerDetails {
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub primary_exchange: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    ticker: SnapshotTicker,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotTicker {
    pub day: Option<SnapshotDay>,
    #[serde(rename = "lastTrade")]
    pub last_trade: Option<SnapshotLastTrade>,
    #[serde(rename = "prevDay")]
    pub prev_day: Option<SnapshotDay>,
}

impl SnapshotTicker {
    /// Last trade, else today's close, else yesterday's close. Zero means
    /// the bar has not printed yet.
    pub fn latest_price(&self) -> Option<f64> {
        let positive = |v: Option<f64>| v.filter(|p| *p > 0.0);

        positive(self.last_trade.as_ref().and_then(|t| t.p))
            .or_else(|| positive(self.day.as_ref().and_then(|d| d.c)))
            .or_else(|| positive(self.prev_day.as_ref().and_then(|d| d.c)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDay {
    pub o: Option<f64>,
    pub h: Option<f64>,
    pub l: Option<f64>,
    pub c: Option<f64>,
    pub v: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotLastTrade {
    pub p: Option<f64>,
    pub s: Option<i64>,
    pub t: Option<i64>,
}
