//! TMDb request types and validation.

use serde::Serialize;

/// Maximum accepted query length, matching the public search form's bound.
const MAX_QUERY_CHARS: usize = 256;

/// Query parameters for `/search/movie`.
///
/// One request fetches one *native* provider page; multi-page aggregation
/// happens above the client.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SearchQuery {
    /// Search query (required).
    pub query: String,

    /// Native page number (1-based).
    pub page: u32,
}

impl SearchQuery {
    /// Validate the search parameters before spending a provider call.
    pub fn validate(&self) -> Result<(), crate::tmdb::error::ProviderError> {
        use crate::tmdb::error::ProviderError;

        if self.query.trim().is_empty() {
            return Err(ProviderError::InvalidQuery("query cannot be empty".to_string()));
        }

        if self.query.chars().count() > MAX_QUERY_CHARS {
            return Err(ProviderError::InvalidQuery(format!(
                "query too long: {} chars (max {})",
                self.query.chars().count(),
                MAX_QUERY_CHARS
            )));
        }

        if self.page == 0 {
            return Err(ProviderError::InvalidQuery("page must be 1-based".to_string()));
        }

        Ok(())
    }
}

/// Filter set for `/discover/movie`.
///
/// Unset fields are omitted from the outgoing query string entirely; the
/// provider applies its own defaults for anything absent. Year bounds arrive
/// here already expressed as ISO date bounds.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DiscoverFilters {
    /// Genre id list, comma-separated (provider syntax).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_genres: Option<String>,

    /// Lower release-date bound, `YYYY-MM-DD`.
    #[serde(rename = "primary_release_date.gte", skip_serializing_if = "Option::is_none")]
    pub release_date_gte: Option<String>,

    /// Upper release-date bound, `YYYY-MM-DD`.
    #[serde(rename = "primary_release_date.lte", skip_serializing_if = "Option::is_none")]
    pub release_date_lte: Option<String>,

    /// Minimum average rating (0-10).
    #[serde(rename = "vote_average.gte", skip_serializing_if = "Option::is_none")]
    pub rating_min: Option<f64>,

    /// Maximum average rating (0-10).
    #[serde(rename = "vote_average.lte", skip_serializing_if = "Option::is_none")]
    pub rating_max: Option<f64>,

    /// Sort key, e.g. `popularity.desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// Native page number; treated as 1 when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Response language, e.g. `en-US`. Overrides the client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl DiscoverFilters {
    /// Copy of the filters with the page default applied.
    pub(crate) fn with_default_page(&self) -> Self {
        Self { page: Some(self.page.unwrap_or(1)), ..self.clone() }
    }
}
