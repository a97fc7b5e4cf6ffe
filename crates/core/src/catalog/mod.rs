//! Movie catalog: cached provider access and caller-defined pagination.
//!
//! Shields the metadata provider from redundant calls with a per-endpoint
//! TTL policy, and presents search results in pages of the caller's chosen
//! size over the provider's fixed 20-item native pages.
//!
//! ### Caching policy
//!
//! TTLs are fixed per endpoint, not caller-configurable. Search and
//! discover responses are never cached: free-text queries and filter
//! combinations give their keys unbounded cardinality.
//!
//! ### Fetch-or-populate
//!
//! Cacheable endpoints look up by key, return a hit immediately, and on a
//! miss issue exactly one provider request, populating the cache only on
//! success. Provider failures propagate untouched and leave the cache
//! unchanged. Concurrent misses for the same key are not de-duplicated;
//! both callers fetch, the last write wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use cinesphere_client::{
    DiscoverFilters, Genre, MovieDetail, MovieProvider, MovieSummary, NATIVE_PAGE_SIZE, ProviderError, RegionOffers,
};

use crate::cache::TtlCache;
use crate::error::Error;

/// TTL for the weekly trending list.
const TRENDING_TTL: Duration = Duration::from_secs(10 * 60);

/// TTL for a single movie record.
const MOVIE_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for similar-movie lists.
const SIMILAR_TTL: Duration = Duration::from_secs(30 * 60);

/// TTL for the genre catalog.
const GENRES_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for watch-provider offers.
const PROVIDERS_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Queries shorter than this (after trimming) never reach the provider.
const MIN_QUERY_CHARS: usize = 2;

/// One page of search or discovery results in the caller's pagination
/// contract, independent of the provider's native page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedPage {
    /// Requested logical page number (1-based).
    pub page: u32,
    /// At most `limit` items, in provider order.
    pub results: Vec<MovieSummary>,
    /// Provider totals recomputed against the caller's page size.
    pub total_pages: u32,
    pub total_results: u64,
}

impl AggregatedPage {
    fn empty() -> Self {
        Self { page: 1, results: Vec::new(), total_pages: 0, total_results: 0 }
    }
}

/// Cached front to the metadata provider.
///
/// Owns its cache exclusively; construct one per process at the composition
/// root, or one per test for isolation.
pub struct MovieCatalog {
    provider: Arc<dyn MovieProvider>,
    cache: TtlCache,
}

impl MovieCatalog {
    pub fn new(provider: Arc<dyn MovieProvider>) -> Self {
        Self { provider, cache: TtlCache::new() }
    }

    /// Cache lookup, falling back to the given provider fetch.
    ///
    /// The fetch future is only awaited on a miss; on a hit it is dropped
    /// unpolled and no request goes out. A failed cache serialization is
    /// logged and the fresh value still returned.
    async fn fetch_or_populate<T, Fut>(&self, key: &str, ttl: Duration, fetch: Fut) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        if let Some(hit) = self.cache.get(key)
            && let Ok(value) = serde_json::from_value::<T>(hit)
        {
            tracing::debug!("cache hit: key={}", key);
            return Ok(value);
        }

        let fresh = fetch.await?;
        match serde_json::to_value(&fresh) {
            Ok(value) => {
                self.cache.set(key, value, ttl);
            }
            Err(e) => tracing::warn!("failed to cache provider response: key={} err={}", key, e),
        }
        Ok(fresh)
    }

    /// Movies trending this week.
    pub async fn trending(&self) -> Result<Vec<MovieSummary>, Error> {
        self.fetch_or_populate("trending:week", TRENDING_TTL, self.provider.trending()).await
    }

    /// Full record for one movie.
    pub async fn movie(&self, id: u64) -> Result<MovieDetail, Error> {
        self.fetch_or_populate(&format!("movie:{id}"), MOVIE_TTL, self.provider.movie(id)).await
    }

    /// Movies similar to the given one.
    pub async fn similar(&self, id: u64) -> Result<Vec<MovieSummary>, Error> {
        self.fetch_or_populate(&format!("similar:{id}"), SIMILAR_TTL, self.provider.similar(id)).await
    }

    /// The provider's genre catalog.
    pub async fn genres(&self) -> Result<Vec<Genre>, Error> {
        self.fetch_or_populate("genres", GENRES_TTL, self.provider.genres()).await
    }

    /// Streaming/rental/purchase offers for one movie, keyed by region.
    pub async fn watch_providers(&self, id: u64) -> Result<HashMap<String, RegionOffers>, Error> {
        self.fetch_or_populate(&format!("providers:{id}"), PROVIDERS_TTL, self.provider.watch_providers(id)).await
    }

    /// Title search, paged to the caller's `limit`.
    ///
    /// Fetches `ceil(limit / 20)` native pages sequentially, concatenates
    /// them in request order, and truncates to `limit`. Native page numbers
    /// advance from the logical page number, not from a flattened item
    /// offset; callers already observe that window, so it stays fixed.
    ///
    /// A trimmed query shorter than two characters short-circuits to an
    /// empty page without touching the provider. Any provider failure
    /// aborts the whole aggregation; partial pages are never returned.
    pub async fn search(&self, query: &str, page: u32, limit: u32) -> Result<AggregatedPage, Error> {
        let normalized = query.trim();
        if normalized.chars().count() < MIN_QUERY_CHARS {
            return Ok(AggregatedPage::empty());
        }

        let page = page.max(1);
        let limit = limit.max(1);
        let pages_needed = limit.div_ceil(NATIVE_PAGE_SIZE);

        let mut results: Vec<MovieSummary> = Vec::with_capacity(limit as usize);
        let mut total_results = 0u64;
        for (i, native_page) in (page..page.saturating_add(pages_needed)).enumerate() {
            let fetched = self.provider.search_page(normalized, native_page).await?;
            if i == 0 {
                total_results = fetched.total_results;
            }
            results.extend(fetched.results);
        }
        results.truncate(limit as usize);

        let total_pages = if total_results > 0 {
            total_results.div_ceil(u64::from(limit))
        } else {
            (results.len() as u64).div_ceil(u64::from(limit))
        };

        tracing::debug!("searched movies: query={} page={} hits={}", normalized, page, results.len());

        Ok(AggregatedPage { page, results, total_pages: total_pages as u32, total_results })
    }

    /// Filtered discovery. Uncached; one native page passes straight
    /// through with the provider's own totals.
    pub async fn discover(&self, filters: &DiscoverFilters) -> Result<AggregatedPage, Error> {
        let fetched = self.provider.discover(filters).await?;
        Ok(AggregatedPage {
            page: fetched.page,
            results: fetched.results,
            total_pages: fetched.total_pages,
            total_results: fetched.total_results,
        })
    }
}
