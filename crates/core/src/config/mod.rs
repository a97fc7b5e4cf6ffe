//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//!
//! 1. Environment variables (CINESPHERE_*)
//! 2. TOML config file (if CINESPHERE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TMDb API key.
    ///
    /// Set via CINESPHERE_TMDB_API_KEY environment variable.
    /// Required only when a metadata endpoint is actually served.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDb base URL.
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// Response language requested from the provider.
    #[serde(default = "default_language")]
    pub language: String,

    /// User-Agent string for outbound HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Outbound HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Path to the SQLite database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Frontend origin the emailed reset link points into.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// SMTP transport URL; reset mail is logged instead of sent when unset.
    #[serde(default)]
    pub smtp_url: Option<String>,

    /// Sender address on outbound mail.
    #[serde(default = "default_email_from")]
    pub email_from: String,

    /// Default logical page size for search responses.
    #[serde(default = "default_search_page_limit")]
    pub search_page_limit: u32,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".into()
}

fn default_language() -> String {
    "en-US".into()
}

fn default_user_agent() -> String {
    "cinesphere/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./cinesphere.sqlite")
}

fn default_bind_addr() -> String {
    "127.0.0.1:5050".into()
}

fn default_frontend_url() -> String {
    "http://localhost:5173".into()
}

fn default_email_from() -> String {
    "noreply@cinesphere.app".into()
}

fn default_search_page_limit() -> u32 {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: default_tmdb_base_url(),
            language: default_language(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            frontend_url: default_frontend_url(),
            smtp_url: None,
            email_from: default_email_from(),
            search_page_limit: default_search_page_limit(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CINESPHERE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CINESPHERE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the TMDb API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_tmdb_api_key(&self) -> Result<&str, ConfigError> {
        self.tmdb_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "tmdb_api_key".into(),
            hint: "Set CINESPHERE_TMDB_API_KEY environment variable".into(),
        })
    }
}
