//! Shared handler state.

use std::sync::Arc;

use cinesphere_core::{AppConfig, MovieCatalog, ResetManager};

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<MovieCatalog>,
    pub reset: Arc<ResetManager>,
    pub config: Arc<AppConfig>,
}
