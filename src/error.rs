// Error types for the GitHub data gateway.
// Covers GitHub API failures, cache corruption, and snapshot I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Transient { status: u16, body: String },

    #[error("Corrupt cache entry '{key}': {source}")]
    CacheCorrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    /// Whether this is a 404 from the API.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited { .. })
    }

    /// Server-side failures worth one more attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transient { status, .. } if *status >= 500)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_only_for_server_errors() {
        let server = GatewayError::Transient {
            status: 502,
            body: String::new(),
        };
        let client = GatewayError::Transient {
            status: 422,
            body: String::new(),
        };
        let limited = GatewayError::RateLimited {
            reset_at: "unknown".to_string(),
        };

        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(!limited.is_retryable());
        assert!(limited.is_rate_limited());
        assert!(!server.is_rate_limited());
    }

    #[test]
    fn test_not_found_display() {
        let err = GatewayError::NotFound("https://api.github.com/users/nobody".to_string());
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Resource not found: https://api.github.com/users/nobody"
        );
    }
}
