use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use ratings_core::{HistoryWriteAck, RatingSummary};
use ratings_http::{require_symbol, AppError};
use serde::Deserialize;

use crate::AppState;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub symbol: Option<String>,
}

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/ratings_history", get(get_history).post(record_history))
}

async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<RatingSummary>, AppError> {
    let symbol = require_symbol(query.symbol)?;

    match state.db.latest(&symbol).await? {
        Some(entry) => {
            tracing::debug!("history for {} last updated {}", symbol, entry.updated_at);
            Ok(Json(entry.rating))
        }
        None => Err(AppError::not_found(format!("no rating history for {}", symbol))),
    }
}

async fn record_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
    body: Result<Json<RatingSummary>, JsonRejection>,
) -> Result<Json<HistoryWriteAck>, AppError> {
    let symbol = require_symbol(query.symbol)?;
    let Json(rating) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    state.db.upsert(&symbol, &rating).await.map_err(|e| {
        tracing::error!("failed to record rating history for {}: {}", symbol, e);
        AppError::from(e)
    })?;

    Ok(Json(HistoryWriteAck {
        success: true,
        symbol,
    }))
}
