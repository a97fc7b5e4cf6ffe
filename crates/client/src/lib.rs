//! Provider client for Cinesphere.
//!
//! This crate wraps the TMDb movie-metadata API behind the [`MovieProvider`]
//! trait consumed by the catalog layer, and owns the provider-side wire types.

pub mod provider;
pub mod tmdb;

pub use provider::MovieProvider;
pub use tmdb::error::ProviderError;
pub use tmdb::request::{DiscoverFilters, SearchQuery};
pub use tmdb::response::{
    Genre, MovieDetail, MoviePage, MovieSummary, ProviderOffer, RegionOffers, WatchProviders,
};
pub use tmdb::{NATIVE_PAGE_SIZE, TmdbClient, TmdbConfig};
