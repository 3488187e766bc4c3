//! Clients for the internal price-target services.
//!
//! Each client is configured with the full endpoint URI of its service
//! (for example `http://ticker:8080/ticker`). Symbol lookups append
//! `?symbol=`, except the ratings service which takes the ticker as the
//! last path segment.

use ratings_core::{validate_symbol, HistoryWriteAck, RatingSummary, RatingsError, RealtimeData, TickerQuote};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::transport::ensure_success;

const SERVICE_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by the internal service clients of one process.
pub fn service_http_client() -> Client {
    Client::builder()
        .timeout(SERVICE_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

async fn read_json<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T, RatingsError> {
    let response = builder
        .send()
        .await
        .map_err(|e| RatingsError::ApiError(e.to_string()))?;
    let response = ensure_success(response).await?;
    response
        .json()
        .await
        .map_err(|e| RatingsError::ApiError(e.to_string()))
}

fn trimmed(endpoint: impl Into<String>) -> String {
    endpoint.into().trim_end_matches('/').to_string()
}

#[derive(Clone)]
pub struct RatingsService {
    endpoint: String,
    client: Client,
}

impl RatingsService {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self { endpoint: trimmed(endpoint), client }
    }

    pub async fn summary(&self, ticker: &str) -> Result<RatingSummary, RatingsError> {
        validate_symbol(ticker)?;
        let url = format!("{}/{}", self.endpoint, ticker.to_lowercase());
        read_json(self.client.get(&url)).await
    }
}

#[derive(Clone)]
pub struct TickerService {
    endpoint: String,
    client: Client,
}

impl TickerService {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self { endpoint: trimmed(endpoint), client }
    }

    pub async fn quote(&self, symbol: &str) -> Result<TickerQuote, RatingsError> {
        read_json(self.client.get(&self.endpoint).query(&[("symbol", symbol)])).await
    }
}

#[derive(Clone)]
pub struct HistoryService {
    endpoint: String,
    client: Client,
}

impl HistoryService {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self { endpoint: trimmed(endpoint), client }
    }

    /// Last recorded summary. A symbol with no history yields a 404 error.
    pub async fn latest(&self, symbol: &str) -> Result<RatingSummary, RatingsError> {
        read_json(self.client.get(&self.endpoint).query(&[("symbol", symbol)])).await
    }

    /// Like `latest`, but a symbol with no history yields the empty summary.
    pub async fn latest_or_empty(&self, symbol: &str) -> Result<RatingSummary, RatingsError> {
        match self.latest(symbol).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!("no rating history for {}, using empty summary", symbol);
                Ok(RatingSummary::default())
            }
            other => other,
        }
    }

    pub async fn record(&self, symbol: &str, rating: &RatingSummary) -> Result<HistoryWriteAck, RatingsError> {
        read_json(
            self.client
                .post(&self.endpoint)
                .query(&[("symbol", symbol)])
                .json(rating),
        )
        .await
    }
}

#[derive(Clone)]
pub struct RealtimeService {
    endpoint: String,
    client: Client,
}

impl RealtimeService {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self { endpoint: trimmed(endpoint), client }
    }

    pub async fn fetch(&self, symbol: &str) -> Result<RealtimeData, RatingsError> {
        read_json(self.client.get(&self.endpoint).query(&[("symbol", symbol)])).await
    }
}

#[derive(Clone)]
pub struct BotService {
    endpoint: String,
    client: Client,
}

impl BotService {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self { endpoint: trimmed(endpoint), client }
    }

    /// Hand a rating update to the bot for broadcast. Returns the bot's reply.
    pub async fn publish(&self, data: &RealtimeData) -> Result<String, RatingsError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(data)
            .send()
            .await
            .map_err(|e| RatingsError::ApiError(e.to_string()))?;
        let response = ensure_success(response).await?;
        response
            .text()
            .await
            .map_err(|e| RatingsError::ApiError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct SymbolQuery {
        symbol: String,
    }

    fn summary(average: f64, highest: f64, lowest: f64) -> RatingSummary {
        RatingSummary {
            average,
            highest: Some(highest),
            lowest: Some(lowest),
        }
    }

    async fn ratings(Path(ticker): Path<String>) -> Json<serde_json::Value> {
        assert_eq!(ticker, "msft");
        Json(json!({"average": 12.6, "highest": 20.0, "lowest": 5.0}))
    }

    async fn history_get(Query(q): Query<SymbolQuery>) -> axum::response::Response {
        if q.symbol == "MSFT" {
            Json(json!({"average": 11.0, "highest": 18.0, "lowest": 4.0})).into_response()
        } else {
            (StatusCode::NOT_FOUND, Json(json!({"error": "no history"}))).into_response()
        }
    }

    async fn history_post(Query(q): Query<SymbolQuery>, Json(body): Json<RatingSummary>) -> Json<serde_json::Value> {
        assert_eq!(body.average, 12.6);
        Json(json!({"success": true, "symbol": q.symbol}))
    }

    async fn bot(Json(data): Json<RealtimeData>) -> String {
        format!("sent update to 1 channel(s) for {}", data.ticker.symbol)
    }

    fn fake_services() -> Router {
        Router::new()
            .route("/ratings/:ticker", get(ratings))
            .route("/ratings_history", get(history_get).post(history_post))
            .route("/bot", axum::routing::post(bot))
    }

    #[tokio::test]
    async fn test_ratings_service_summary() {
        let base = serve(fake_services()).await;
        let service = RatingsService::new(format!("{}/ratings", base), service_http_client());

        let rating = service.summary("MSFT").await.unwrap();
        assert_eq!(rating, summary(12.6, 20.0, 5.0));
    }

    #[tokio::test]
    async fn test_ratings_service_rejects_path_in_ticker() {
        let base = serve(fake_services()).await;
        let service = RatingsService::new(format!("{}/ratings", base), service_http_client());

        let err = service.summary("msft/../../bot").await.unwrap_err();
        assert!(matches!(err, RatingsError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_history_service_latest_and_record() {
        let base = serve(fake_services()).await;
        let service = HistoryService::new(format!("{}/ratings_history", base), service_http_client());

        assert_eq!(service.latest("MSFT").await.unwrap(), summary(11.0, 18.0, 4.0));
        assert!(service.latest("AAPL").await.unwrap_err().is_not_found());
        assert_eq!(service.latest_or_empty("AAPL").await.unwrap(), RatingSummary::default());

        let ack = service.record("MSFT", &summary(12.6, 20.0, 5.0)).await.unwrap();
        assert!(ack.success);
        assert_eq!(ack.symbol, "MSFT");
    }

    #[tokio::test]
    async fn test_bot_service_publish() {
        let base = serve(fake_services()).await;
        let service = BotService::new(format!("{}/bot", base), service_http_client());

        let data = RealtimeData {
            rating: summary(12.6, 20.0, 5.0),
            rating_history: RatingSummary::default(),
            ticker: TickerQuote {
                company_name: "Microsoft".to_string(),
                price: 410.0,
                symbol: "MSFT".to_string(),
            },
        };
        let reply = service.publish(&data).await.unwrap();
        assert_eq!(reply, "sent update to 1 channel(s) for MSFT");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_api_error() {
        let service = TickerService::new("http://127.0.0.1:1/ticker", service_http_client());
        let err = service.quote("MSFT").await.unwrap_err();
        assert!(matches!(err, RatingsError::ApiError(_)));
    }
}
