//! SQLite persistence for accounts and password-reset tokens.
//!
//! Async access via tokio-rusqlite, WAL mode for concurrent readers, and
//! versioned schema migrations applied at open.

pub mod connection;
pub mod migrations;

pub use connection::Database;
