//! TMDb client error types.

use std::sync::Arc;

/// Errors from the TMDb metadata provider client.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Missing TMDB_API_KEY environment variable.
    #[error("missing API key: TMDB_API_KEY not set")]
    MissingApiKey,

    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The requested resource does not exist upstream.
    #[error("not found")]
    NotFound,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    Auth,

    /// Rate limited by the provider.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Whether this error means the resource is missing rather than the
    /// provider being unreachable. Callers may map the two differently.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = ProviderError::InvalidQuery("too short".to_string());
        assert!(err.to_string().contains("invalid query"));

        let err = ProviderError::Http { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ProviderError::NotFound.is_not_found());
        assert!(!ProviderError::Timeout.is_not_found());
        assert!(!ProviderError::Http { status: 500 }.is_not_found());
    }
}
