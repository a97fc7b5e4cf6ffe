//! Movie browsing routes.
//!
//! Handlers validate at the boundary, then delegate to the catalog. The
//! year bounds accepted here become ISO date bounds before they reach the
//! provider.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use cinesphere_client::{DiscoverFilters, Genre, MovieDetail, MovieSummary, RegionOffers};
use cinesphere_core::AggregatedPage;

use crate::error::ApiError;
use crate::state::AppState;

/// Sort keys accepted by the discover route.
const ALLOWED_SORTS: &[&str] = &[
    "popularity.desc",
    "popularity.asc",
    "vote_average.desc",
    "vote_average.asc",
    "primary_release_date.desc",
    "primary_release_date.asc",
];

pub async fn trending(State(state): State<AppState>) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    let movies = state.catalog.trending().await?;
    tracing::info!("fetched trending movies: count={}", movies.len());
    Ok(Json(movies))
}

pub async fn genres(State(state): State<AppState>) -> Result<Json<Vec<Genre>>, ApiError> {
    Ok(Json(state.catalog.genres().await?))
}

pub async fn movie(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<MovieDetail>, ApiError> {
    let movie = state.catalog.movie(id).await?;
    tracing::info!("fetched movie: id={}", id);
    Ok(Json(movie))
}

pub async fn similar(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    Ok(Json(state.catalog.similar(id).await?))
}

pub async fn providers(
    State(state): State<AppState>, Path(id): Path<u64>,
) -> Result<Json<HashMap<String, RegionOffers>>, ApiError> {
    Ok(Json(state.catalog.watch_providers(id).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn search(
    State(state): State<AppState>, Query(params): Query<SearchParams>,
) -> Result<Json<AggregatedPage>, ApiError> {
    let normalized = params.query.as_deref().unwrap_or("").trim().to_string();
    if normalized.is_empty() {
        return Err(ApiError::bad_request("Query parameter is required"));
    }

    let page = params.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = params.limit.unwrap_or(state.config.search_page_limit).clamp(1, 40);

    let data = state.catalog.search(&normalized, page, limit).await?;
    tracing::info!("searched movies: query={} count={}", normalized, data.results.len());
    Ok(Json(data))
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverParams {
    pub genres: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub language: Option<String>,
}

/// Turn boundary parameters into provider filters.
fn compose_filters(params: DiscoverParams) -> Result<DiscoverFilters, ApiError> {
    let sort_by = params.sort_by.unwrap_or_else(|| "popularity.desc".to_string());
    if !ALLOWED_SORTS.contains(&sort_by.as_str()) {
        return Err(ApiError::bad_request(format!("Unknown sort key: {sort_by}")));
    }

    for rating in [params.rating_min, params.rating_max].into_iter().flatten() {
        if !(0.0..=10.0).contains(&rating) {
            return Err(ApiError::bad_request("Rating bounds must be between 0 and 10"));
        }
    }

    Ok(DiscoverFilters {
        with_genres: params.genres,
        release_date_gte: params.year_from.map(|y| format!("{y}-01-01")),
        release_date_lte: params.year_to.map(|y| format!("{y}-12-31")),
        rating_min: params.rating_min,
        rating_max: params.rating_max,
        sort_by: Some(sort_by),
        page: params.page,
        language: params.language,
    })
}

pub async fn discover(
    State(state): State<AppState>, Query(params): Query<DiscoverParams>,
) -> Result<Json<AggregatedPage>, ApiError> {
    let filters = compose_filters(params)?;
    Ok(Json(state.catalog.discover(&filters).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_filters_year_bounds_become_dates() {
        let filters = compose_filters(DiscoverParams {
            year_from: Some(1990),
            year_to: Some(1999),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(filters.release_date_gte.as_deref(), Some("1990-01-01"));
        assert_eq!(filters.release_date_lte.as_deref(), Some("1999-12-31"));
    }

    #[test]
    fn test_compose_filters_defaults_sort() {
        let filters = compose_filters(DiscoverParams::default()).unwrap();
        assert_eq!(filters.sort_by.as_deref(), Some("popularity.desc"));
        assert!(filters.page.is_none());
        assert!(filters.with_genres.is_none());
    }

    #[test]
    fn test_compose_filters_rejects_unknown_sort() {
        let result = compose_filters(DiscoverParams { sort_by: Some("chaos.desc".into()), ..Default::default() });
        assert!(result.is_err());
    }

    #[test]
    fn test_compose_filters_rejects_out_of_range_rating() {
        let result = compose_filters(DiscoverParams { rating_min: Some(11.0), ..Default::default() });
        assert!(result.is_err());

        let result = compose_filters(DiscoverParams { rating_max: Some(-0.5), ..Default::default() });
        assert!(result.is_err());
    }
}
