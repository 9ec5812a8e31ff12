//! Error types for narrative provider calls

use thiserror::Error;

/// Result type for narrative operations
pub type Result<T> = std::result::Result<T, NarrativeError>;

/// Errors that can occur while requesting narrative text
#[derive(Error, Debug)]
pub enum NarrativeError {
    /// API request failed with a non-success status
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Request did not complete before the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response parsed but did not carry the expected text
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl NarrativeError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => Self::AuthenticationFailed,
            429 => Self::RateLimitExceeded(body),
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            NarrativeError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            NarrativeError::AuthenticationFailed
        ));
        assert!(matches!(
            NarrativeError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string()),
            NarrativeError::RateLimitExceeded(body) if body == "slow down"
        ));

        let err = NarrativeError::from_status(StatusCode::BAD_GATEWAY, "upstream".to_string());
        assert_eq!(
            err.to_string(),
            "API request failed: HTTP 502 Bad Gateway: upstream"
        );
    }
}
