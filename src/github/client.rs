// GitHub API HTTP client.
// Handles optional authentication, rate limit tracking, and status mapping.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with optional authentication and rate limit tracking.
///
/// All request methods take `&self`, so one client can serve many
/// concurrent lookups.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client against `base_url` (api.github.com, GitHub Enterprise, or a test server).
    /// A token is optional; it only raises the rate limit.
    pub fn with_base_url(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("ghfolio"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 0,
            retry_backoff: Duration::ZERO,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Create a client from gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Ok(
            Self::with_base_url(&config.api_base, config.token.as_deref(), config.request_timeout)?
                .with_retries(config.max_retries, config.retry_backoff),
        )
    }

    /// Retry server errors up to `max_retries` times with linear backoff.
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    /// Get the most recently observed rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|rl| rl.clone())
            .unwrap_or_default()
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let no_params: [(&str, &str); 0] = [];
        self.get_with_params(endpoint, &no_params).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt = 0;

        loop {
            let response = self.client.get(&url).query(params).send().await?;
            self.update_rate_limit(&response);

            match self.check_response(response).await {
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(url = %url, attempt, "server error, retrying: {}", err);
                    sleep(self.retry_backoff * attempt).await;
                }
                result => return result,
            }
        }
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };

        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }

        if rate_limit.limit > 0 && rate_limit.remaining * 10 < rate_limit.limit {
            debug!(
                remaining = rate_limit.remaining,
                limit = rate_limit.limit,
                "rate limit running low"
            );
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(GatewayError::NotFound(url))
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                let reset = self.rate_limit().reset;
                let reset_at = chrono::DateTime::from_timestamp(reset as i64, 0)
                    .filter(|_| reset > 0)
                    .map(|dt| dt.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                Err(GatewayError::RateLimited { reset_at })
            }
            status => Err(GatewayError::Transient {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
