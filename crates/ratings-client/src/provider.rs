//! Client for the third-party analyst data provider.

use ratings_core::{validate_symbol, RatingRecord, RatingsError};
use serde::Deserialize;
use std::time::Duration;

use crate::transport::{ensure_success, Transport};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
const PROVIDER_REQUESTS_PER_MINUTE: usize = 120;

#[derive(Clone)]
pub struct AnalystDataClient {
    base_url: String,
    transport: Transport,
}

impl AnalystDataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport: Transport::new(PROVIDER_TIMEOUT, PROVIDER_REQUESTS_PER_MINUTE),
        }
    }

    pub fn payload_url(&self, ticker: &str) -> String {
        format!("{}/{}/payload.json", self.base_url, ticker.to_lowercase())
    }

    /// Fetch the raw analyst ratings for `ticker`. A payload without an
    /// `analysts.ratings` array is an error.
    pub async fn fetch_ratings(&self, ticker: &str) -> Result<Vec<RatingRecord>, RatingsError> {
        validate_symbol(ticker)?;
        let url = self.payload_url(ticker);
        tracing::debug!("requesting analyst payload from {}", url);

        let response = self
            .transport
            .send(self.transport.client().get(&url))
            .await?;
        let response = ensure_success(response).await?;

        let payload: ProviderPayload = response
            .json()
            .await
            .map_err(|e| RatingsError::ApiError(e.to_string()))?;

        payload
            .analysts
            .and_then(|a| a.ratings)
            .ok_or_else(|| {
                RatingsError::InvalidData(
                    "no analyst ratings returned from analyst data request".to_string(),
                )
            })
    }
}

#[derive(Debug, Deserialize)]
struct ProviderPayload {
    #[serde(default)]
    analysts: Option<AnalystsSection>,
}

#[derive(Debug, Deserialize)]
struct AnalystsSection {
    #[serde(default)]
    ratings: Option<Vec<RatingRecord>>,
}
