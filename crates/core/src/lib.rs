//! Core components for Cinesphere.
//!
//! This crate provides:
//! - TTL cache and the cached movie catalog (provider aggregation)
//! - Password-reset token lifecycle
//! - SQLite persistence for accounts and tokens
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod reset;

pub use cache::TtlCache;
pub use catalog::{AggregatedPage, MovieCatalog};
pub use config::{AppConfig, ConfigError};
pub use db::Database;
pub use error::Error;
pub use reset::{
    Account, AccountStore, LogMailer, Mailer, ResetManager, ResetTokenStore, SmtpMailer, SqliteAccountStore,
    SqliteResetTokenStore,
};
