use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use ratings_core::TickerQuote;
use ratings_http::{require_symbol, AppError};
use serde::Deserialize;

use crate::AppState;

#[derive(Deserialize)]
pub struct TickerQuery {
    pub symbol: Option<String>,
}

pub fn ticker_routes() -> Router<AppState> {
    Router::new().route("/ticker", get(get_ticker))
}

async fn get_ticker(
    State(state): State<AppState>,
    Query(query): Query<TickerQuery>,
) -> Result<Json<TickerQuote>, AppError> {
    let symbol = require_symbol(query.symbol)?;

    let quote = state.polygon.get_quote(&symbol).await.map_err(|e| {
        tracing::warn!("ticker lookup failed for {}: {}", symbol, e);
        if e.is_not_found() {
            AppError::not_found(format!("unknown symbol {}", symbol))
        } else {
            AppError::upstream(e)
        }
    })?;

    Ok(Json(quote))
}
