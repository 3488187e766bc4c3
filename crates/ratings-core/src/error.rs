use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatingsError {
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl RatingsError {
    /// True when the upstream answered but had nothing for the request.
    pub fn is_not_found(&self) -> bool {
        match self {
            RatingsError::NotFound(_) => true,
            RatingsError::UpstreamStatus { status, .. } => *status == 404,
            _ => false,
        }
    }
}
