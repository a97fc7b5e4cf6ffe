//! TMDb response types.
//!
//! Field sets cover what the application consumes; unknown provider fields
//! are ignored on decode. Totals default to zero when the provider omits
//! them so pagination math never trips on a missing field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Movie summary as returned by list endpoints (trending, search, discover,
/// similar).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

/// Full movie record from `/movie/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

/// A genre entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Envelope for `/genre/movie/list`.
#[derive(Debug, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

/// Envelope for endpoints consumed results-only (trending, similar).
#[derive(Debug, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// One native provider page, as returned by `/search/movie` and
/// `/discover/movie`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

/// Envelope for `/movie/{id}/watch/providers`: offers keyed by region code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchProviders {
    #[serde(default)]
    pub results: HashMap<String, RegionOffers>,
}

/// Offers available in one region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionOffers {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<ProviderOffer>,
    #[serde(default)]
    pub rent: Vec<ProviderOffer>,
    #[serde(default)]
    pub buy: Vec<ProviderOffer>,
}

/// A single streaming/rental/purchase offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOffer {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"{
        "page": 1,
        "results": [
            {
                "id": 78,
                "title": "Blade Runner",
                "overview": "In the smog-choked dystopian Los Angeles of 2019...",
                "poster_path": "/63N9uy8nd9j7Eog2axPQ8lbr3Wj.jpg",
                "release_date": "1982-06-25",
                "vote_average": 7.9,
                "vote_count": 12000,
                "popularity": 96.5,
                "genre_ids": [878, 18, 53]
            },
            {
                "id": 335984,
                "title": "Blade Runner 2049",
                "overview": "Thirty years after the events of the first film...",
                "vote_average": 7.5
            }
        ],
        "total_pages": 2,
        "total_results": 27
    }"#;

    const PROVIDERS_FIXTURE: &str = r#"{
        "id": 78,
        "results": {
            "US": {
                "link": "https://www.themoviedb.org/movie/78/watch?locale=US",
                "flatrate": [
                    {"provider_id": 8, "provider_name": "Netflix", "logo_path": "/t2yyOv40HZeVlLjYsCsPHnWLk4W.jpg"}
                ],
                "rent": [
                    {"provider_id": 2, "provider_name": "Apple TV", "logo_path": "/peURlLlr8jggOwK53fJ5wdQl05y.jpg"}
                ],
                "buy": []
            }
        }
    }"#;

    #[test]
    fn test_deserialize_search_page() {
        let page: MoviePage = serde_json::from_str(SEARCH_FIXTURE).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_results, 27);

        let first = &page.results[0];
        assert_eq!(first.id, 78);
        assert_eq!(first.title, "Blade Runner");
        assert_eq!(first.genre_ids, vec![878, 18, 53]);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let page: MoviePage = serde_json::from_str(SEARCH_FIXTURE).unwrap();
        let sparse = &page.results[1];
        assert!(sparse.poster_path.is_none());
        assert!(sparse.release_date.is_none());
        assert_eq!(sparse.vote_count, 0);
        assert!(sparse.genre_ids.is_empty());
    }

    #[test]
    fn test_missing_totals_default_to_zero() {
        let page: MoviePage = serde_json::from_str(r#"{"page": 1, "results": []}"#).unwrap();
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn test_deserialize_genre_list() {
        let list: GenreList =
            serde_json::from_str(r#"{"genres": [{"id": 27, "name": "Horror"}, {"id": 53, "name": "Thriller"}]}"#)
                .unwrap();
        assert_eq!(list.genres.len(), 2);
        assert_eq!(list.genres[0], Genre { id: 27, name: "Horror".to_string() });
    }

    #[test]
    fn test_deserialize_watch_providers() {
        let providers: WatchProviders = serde_json::from_str(PROVIDERS_FIXTURE).unwrap();
        let us = providers.results.get("US").unwrap();
        assert_eq!(us.flatrate.len(), 1);
        assert_eq!(us.flatrate[0].provider_name, "Netflix");
        assert_eq!(us.rent.len(), 1);
        assert!(us.buy.is_empty());
        assert!(us.link.as_deref().unwrap().contains("locale=US"));
    }

    #[test]
    fn test_deserialize_movie_detail() {
        let detail: MovieDetail = serde_json::from_str(
            r#"{
                "id": 78,
                "title": "Blade Runner",
                "overview": "...",
                "tagline": "Man has made his match... now it's his problem.",
                "runtime": 117,
                "status": "Released",
                "genres": [{"id": 878, "name": "Science Fiction"}],
                "imdb_id": "tt0083658"
            }"#,
        )
        .unwrap();
        assert_eq!(detail.runtime, Some(117));
        assert_eq!(detail.genres.len(), 1);
        assert_eq!(detail.imdb_id.as_deref(), Some("tt0083658"));
    }
}
