//! TMDb metadata provider client.
//!
//! Thin wrapper over the TMDb v3 REST API with request validation,
//! status-code classification, and response decoding.
//!
//! ### Specification
//!
//! - **Base URL**: `https://api.themoviedb.org/3`
//! - **Authentication**: `api_key` query parameter on every request.
//! - **Paging**: every list endpoint returns a fixed 20-item native page;
//!   callers that need a different page size aggregate above this client.
//! - **Failure**: errors are classified, never retried here.

pub mod error;
pub mod request;
pub mod response;

pub use error::ProviderError;
pub use request::{DiscoverFilters, SearchQuery};
pub use response::{
    Genre, GenreList, ListEnvelope, MovieDetail, MoviePage, MovieSummary, RegionOffers, WatchProviders,
};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::provider::MovieProvider;

/// Number of items in one native provider page, uniform across endpoints.
pub const NATIVE_PAGE_SIZE: u32 = 20;

/// Default base URL for the TMDb v3 API.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "cinesphere/0.1";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDb client configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API key from TMDB_API_KEY env var.
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: cinesphere/0.x).
    pub user_agent: String,
    /// Response language sent with every request (default: en-US).
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl TmdbConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads TMDB_API_KEY from environment. Returns error if not set.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("TMDB_API_KEY").map_err(|_| ProviderError::MissingApiKey)?;

        Ok(Self { api_key, ..Default::default() })
    }
}

/// TMDb API client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: TmdbConfig,
}

impl TmdbClient {
    /// Create a new TMDb client with the given configuration.
    pub fn new(config: TmdbConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(std::sync::Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Create a new TMDb client from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(TmdbConfig::from_env()?)
    }

    /// Issue one GET request and decode the JSON body.
    ///
    /// The api_key and language parameters are appended to whatever
    /// endpoint-specific parameters the caller serializes.
    async fn get_json<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self, path: &str, params: &Q,
    ) -> Result<T, ProviderError> {
        let start = Instant::now();
        let url = format!("{}{}", self.config.base_url, path);

        let http_response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&[("api_key", self.config.api_key.as_str()), ("language", self.config.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = http_response.status();
        tracing::debug!("TMDb response: path={} status={}", path, status);

        if status == 401 || status == 403 {
            return Err(ProviderError::Auth);
        }

        if status == 404 {
            return Err(ProviderError::NotFound);
        }

        if status == 429 {
            return Err(ProviderError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ProviderError::Http { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await.map_err(ProviderError::from)?;
        let decoded: T = serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))?;

        tracing::debug!("TMDb request completed: path={} elapsed={:?}", path, start.elapsed());

        Ok(decoded)
    }
}

/// No query parameters beyond the standing api_key/language pair.
const NO_PARAMS: &[(&str, &str)] = &[];

#[async_trait]
impl MovieProvider for TmdbClient {
    async fn trending(&self) -> Result<Vec<MovieSummary>, ProviderError> {
        let envelope: ListEnvelope = self.get_json("/trending/movie/week", NO_PARAMS).await?;
        Ok(envelope.results)
    }

    async fn movie(&self, id: u64) -> Result<MovieDetail, ProviderError> {
        self.get_json(&format!("/movie/{id}"), NO_PARAMS).await
    }

    async fn similar(&self, id: u64) -> Result<Vec<MovieSummary>, ProviderError> {
        let envelope: ListEnvelope = self.get_json(&format!("/movie/{id}/similar"), NO_PARAMS).await?;
        Ok(envelope.results)
    }

    async fn genres(&self) -> Result<Vec<Genre>, ProviderError> {
        let list: GenreList = self.get_json("/genre/movie/list", NO_PARAMS).await?;
        Ok(list.genres)
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<MoviePage, ProviderError> {
        let req = SearchQuery { query: query.to_string(), page };
        req.validate()?;

        tracing::debug!("searching TMDb: query={} page={}", req.query, req.page);
        self.get_json("/search/movie", &req).await
    }

    async fn discover(&self, filters: &DiscoverFilters) -> Result<MoviePage, ProviderError> {
        self.get_json("/discover/movie", &filters.with_default_page()).await
    }

    async fn watch_providers(&self, id: u64) -> Result<HashMap<String, RegionOffers>, ProviderError> {
        let envelope: WatchProviders = self.get_json(&format!("/movie/{id}/watch/providers"), NO_PARAMS).await?;
        Ok(envelope.results)
    }
}
