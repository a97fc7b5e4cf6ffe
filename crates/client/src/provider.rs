//! Provider trait: the seam between the catalog layer and the metadata API.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::tmdb::error::ProviderError;
use crate::tmdb::request::DiscoverFilters;
use crate::tmdb::response::{Genre, MovieDetail, MoviePage, MovieSummary, RegionOffers};

/// Read access to the external movie-metadata provider.
///
/// Implemented by [`crate::TmdbClient`] and by stub providers in tests.
/// Every method is one provider request; paging beyond a single native page
/// is the caller's concern.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Movies trending this week.
    async fn trending(&self) -> Result<Vec<MovieSummary>, ProviderError>;

    /// Full record for one movie.
    async fn movie(&self, id: u64) -> Result<MovieDetail, ProviderError>;

    /// Movies similar to the given one.
    async fn similar(&self, id: u64) -> Result<Vec<MovieSummary>, ProviderError>;

    /// The provider's genre catalog.
    async fn genres(&self) -> Result<Vec<Genre>, ProviderError>;

    /// One native page of title-search results.
    async fn search_page(&self, query: &str, page: u32) -> Result<MoviePage, ProviderError>;

    /// One native page of filtered discovery results.
    async fn discover(&self, filters: &DiscoverFilters) -> Result<MoviePage, ProviderError>;

    /// Streaming/rental/purchase offers for one movie, keyed by region code.
    async fn watch_providers(&self, id: u64) -> Result<HashMap<String, RegionOffers>, ProviderError>;
}
