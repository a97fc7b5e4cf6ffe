//! Cinesphere server entry point.
//!
//! Boots the HTTP API: loads configuration, wires the TMDb client, catalog
//! cache, SQLite stores and mailer together, and serves the routes.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cinesphere_client::{TmdbClient, TmdbConfig};
use cinesphere_core::{
    AppConfig, Database, LogMailer, Mailer, MovieCatalog, ResetManager, SmtpMailer, SqliteAccountStore,
    SqliteResetTokenStore,
};

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load()?;

    let tmdb = TmdbClient::new(TmdbConfig {
        api_key: config.require_tmdb_api_key()?.to_string(),
        base_url: config.tmdb_base_url.clone(),
        timeout: config.timeout(),
        user_agent: config.user_agent.clone(),
        language: config.language.clone(),
    })?;
    let catalog = Arc::new(MovieCatalog::new(Arc::new(tmdb)));

    let db = Database::open(&config.db_path).await?;
    let tokens = Arc::new(SqliteResetTokenStore::new(db.clone()));
    let accounts = Arc::new(SqliteAccountStore::new(db));

    let mailer: Arc<dyn Mailer> = match config.smtp_url.as_deref() {
        Some(url) => Arc::new(SmtpMailer::new(url, &config.email_from)?),
        None => {
            tracing::warn!("no SMTP transport configured; reset links will only appear in the log");
            Arc::new(LogMailer)
        }
    };
    let reset = Arc::new(ResetManager::new(tokens, accounts, mailer, config.frontend_url.clone()));

    let state = AppState { catalog, reset, config: Arc::new(config) };
    let app = routes::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    tracing::info!("Cinesphere server listening on {}", state.config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
