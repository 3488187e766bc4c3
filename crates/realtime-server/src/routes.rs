use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use ratings_core::RealtimeData;
use ratings_http::{require_symbol, AppError};
use serde::Deserialize;

use crate::AppState;

#[derive(Deserialize)]
pub struct RealtimeQuery {
    pub symbol: Option<String>,
}

pub fn realtime_routes() -> Router<AppState> {
    Router::new().route("/realtime", get(get_realtime))
}

async fn get_realtime(
    State(state): State<AppState>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<RealtimeData>, AppError> {
    let symbol = require_symbol(query.symbol)?;

    let (ticker, rating, rating_history) = tokio::join!(
        state.ticker.quote(&symbol),
        state.ratings.summary(&symbol),
        state.history.latest_or_empty(&symbol),
    );

    let upstream = |service: &str, e: ratings_core::RatingsError| {
        tracing::error!("{} lookup failed for {}: {}", service, symbol, e);
        AppError::bad_gateway(format!("{} service failed for {}: {}", service, symbol, e))
    };

    Ok(Json(RealtimeData {
        ticker: ticker.map_err(|e| upstream("ticker", e))?,
        rating: rating.map_err(|e| upstream("ratings", e))?,
        rating_history: rating_history.map_err(|e| upstream("ratings history", e))?,
    }))
}
