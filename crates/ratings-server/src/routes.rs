use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use ratings_core::{validate_symbol, Message, RatingSummary};
use ratings_http::AppError;

use crate::AppState;

pub fn rating_routes() -> Router<AppState> {
    Router::new().route("/ratings/:ticker", get(get_ratings))
}

async fn get_ratings(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<RatingSummary>, AppError> {
    let ticker = ticker.to_lowercase();
    validate_symbol(&ticker)?;

    let records = state.provider.fetch_ratings(&ticker).await.map_err(|e| {
        tracing::error!("failed to fetch analyst ratings for {}: {}", ticker, e);
        AppError::internal(e.to_string())
    })?;

    let summary = state.aggregator.summarize(&records);
    tracing::info!("{}", Message::summary_line(&ticker.to_uppercase(), &summary));

    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use axum::{body::Body, http::Request, http::StatusCode};
    use ratings_client::AnalystDataClient;
    use ratings_core::{AggregationPolicy, RatingAggregator};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn payload(Path(ticker): Path<String>) -> Json<Value> {
        match ticker.as_str() {
            "msft" => Json(json!({
                "analysts": {
                    "ratings": [
                        {"priceTarget": {"value": 10}, "expert": {"avgReturn": 0.2}},
                        {"priceTarget": {"value": 15}, "expert": {"avgReturn": -0.1}},
                        {"priceTarget": {"value": 20}},
                        {"priceTarget": {"value": 5}, "expert": {"avgReturn": 0.05}},
                        {"priceTarget": {"value": 13}, "expert": {"avgReturn": 0.3}},
                        {"priceTarget": null}
                    ]
                }
            })),
            "empty" => Json(json!({"analysts": {"ratings": []}})),
            _ => Json(json!({"analysts": {}})),
        }
    }

    async fn app(policy: AggregationPolicy) -> Router {
        let base = serve(Router::new().route("/:ticker/payload.json", get(payload))).await;
        router(AppState {
            provider: AnalystDataClient::new(base),
            aggregator: RatingAggregator::new(policy),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ratings_all_priced() {
        let (status, body) = get_json(app(AggregationPolicy::AllPriced).await, "/ratings/MSFT").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"average": 12.6, "highest": 20.0, "lowest": 5.0}));
    }

    #[tokio::test]
    async fn test_ratings_positive_return() {
        let (status, body) =
            get_json(app(AggregationPolicy::PositiveReturn).await, "/ratings/msft").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"average": 9.33, "highest": 13.0, "lowest": 5.0}));
    }

    #[tokio::test]
    async fn test_ratings_empty_list() {
        let (status, body) = get_json(app(AggregationPolicy::AllPriced).await, "/ratings/empty").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"average": 0.0}));
    }

    #[tokio::test]
    async fn test_ratings_rejects_encoded_path_separators() {
        for uri in ["/ratings/msft%2F..%2Faapl", "/ratings/ms%20ft", "/ratings/.."] {
            let (status, body) = get_json(app(AggregationPolicy::AllPriced).await, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["error"].as_str().unwrap().starts_with("invalid symbol"));
        }
    }

    #[tokio::test]
    async fn test_ratings_missing_from_payload() {
        let (status, body) = get_json(app(AggregationPolicy::AllPriced).await, "/ratings/aapl").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("no analyst ratings"));
    }
}
