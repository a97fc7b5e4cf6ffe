//! Route table.

pub mod movies;
pub mod reset;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/movies/trending", get(movies::trending))
        .route("/api/movies/genres", get(movies::genres))
        .route("/api/movies/discover", get(movies::discover))
        .route("/api/movies/search", get(movies::search))
        .route("/api/movies/:id", get(movies::movie))
        .route("/api/movies/:id/similar", get(movies::similar))
        .route("/api/movies/:id/providers", get(movies::providers))
        .route("/api/password/forgot", post(reset::forgot))
        .route("/api/password/reset", post(reset::reset))
        .route("/api/password/verify-token", post(reset::verify_token))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
