use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use ratings_core::{validate_symbol, RatingsError};
use serde_json::json;

/// Error returned by route handlers. Renders as `{"error": "..."}` with the
/// given status code.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Map an upstream failure: 404 stays 404, anything else is a bad gateway.
    pub fn upstream(err: RatingsError) -> Self {
        if err.is_not_found() {
            Self::not_found(err.to_string())
        } else {
            Self::bad_gateway(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RatingsError> for AppError {
    fn from(e: RatingsError) -> Self {
        match &e {
            RatingsError::NotFound(msg) => AppError::not_found(msg.clone()),
            RatingsError::InvalidData(msg) => AppError::bad_request(msg.clone()),
            _ => AppError::internal(e.to_string()),
        }
    }
}

/// Symbol from an optional `?symbol=` query value. Missing or blank is a 400,
/// as is anything other than letters, digits, `.` and `-`.
pub fn require_symbol(symbol: Option<String>) -> Result<String, AppError> {
    let symbol = symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("symbol query parameter is required"))?;
    validate_symbol(&symbol)?;
    Ok(symbol)
}
