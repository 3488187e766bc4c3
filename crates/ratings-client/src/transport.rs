use ratings_core::RatingsError;
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_AFTER_429: Duration = Duration::from_secs(15);

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
pub struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    pub async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let Some(&oldest) = ts.front() else {
                continue;
            };
            let sleep_dur = (oldest + self.window).duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for an upstream slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// A `reqwest::Client` paired with a rate limiter and HTTP 429 retry.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    rate_limiter: RateLimiter,
}

impl Transport {
    pub fn new(timeout: Duration, max_requests_per_minute: usize) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            rate_limiter: RateLimiter::new(max_requests_per_minute, Duration::from_secs(60)),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Send a request with rate limiting and automatic 429 retry.
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, RatingsError> {
        let request = builder.build().map_err(|e| RatingsError::ApiError(e.to_string()))?;

        for attempt in 0..MAX_ATTEMPTS {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| RatingsError::ApiError("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| RatingsError::ApiError(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            tracing::warn!(
                "Upstream 429 rate limited, waiting {}s before retry {}/{}",
                RETRY_AFTER_429.as_secs(),
                attempt + 1,
                MAX_ATTEMPTS
            );
            tokio::time::sleep(RETRY_AFTER_429).await;
        }

        Err(RatingsError::ApiError(format!(
            "Rate limited by upstream after {} retries",
            MAX_ATTEMPTS
        )))
    }
}

/// Turn a non-success response into an error carrying status and body.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RatingsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(RatingsError::UpstreamStatus {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
    })
}
