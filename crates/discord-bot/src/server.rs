use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use ratings_core::{Message as ChatMessage, RealtimeData};
use ratings_http::AppError;
use std::sync::Arc;

use crate::channels::{Broadcaster, CHANNEL_NAME};

#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Arc<dyn Broadcaster>,
}

pub fn bot_routes() -> Router<AppState> {
    Router::new().route("/bot", post(post_update))
}

async fn post_update(
    State(state): State<AppState>,
    body: Result<Json<RealtimeData>, JsonRejection>,
) -> Result<String, AppError> {
    let Json(data) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let symbol = data.ticker.symbol.clone();

    if state.broadcaster.channel_count() == 0 {
        tracing::error!("no {} channels registered, dropping update for {}", CHANNEL_NAME, symbol);
        return Err(AppError::internal(format!(
            "no {} channels registered for {}",
            CHANNEL_NAME, symbol
        )));
    }

    let report = state
        .broadcaster
        .broadcast(&ChatMessage::rating_update(&data))
        .await;

    if report.sent == 0 {
        return Err(AppError::internal(format!(
            "failed to send update to any channel for {}",
            symbol
        )));
    }
    if report.failed > 0 {
        tracing::warn!("update for {} failed in {} channel(s)", symbol, report.failed);
    }

    Ok(format!("sent update to {} channel(s) for {}", report.sent, symbol))
}
