//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values after they
//! have been loaded from environment, files, or defaults.

use thiserror::Error;

use crate::config::AppConfig;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `search_page_limit` is 0 or exceeds two native provider pages
    /// - `frontend_url` is empty
    /// - `email_from` is not a plausible address
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.search_page_limit == 0 || self.search_page_limit > 40 {
            return Err(ConfigError::Invalid {
                field: "search_page_limit".into(),
                reason: "must be between 1 and 40".into(),
            });
        }

        if self.frontend_url.is_empty() {
            return Err(ConfigError::Invalid { field: "frontend_url".into(), reason: "must not be empty".into() });
        }

        if !self.email_from.contains('@') {
            return Err(ConfigError::Invalid {
                field: "email_from".into(),
                reason: "must be an email address".into(),
            });
        }

        Ok(())
    }
}
