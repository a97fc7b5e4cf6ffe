//! Unified error types for the Cinesphere core.

use cinesphere_client::ProviderError;
use tokio_rusqlite::rusqlite;

/// Unified error type for catalog and password-reset operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The metadata provider call failed. Carries the classified cause so
    /// callers can distinguish a missing resource from an unreachable
    /// upstream.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Reset token is missing, expired, or bound to a different account.
    /// One variant for all three: the caller never learns which.
    #[error("invalid or expired reset token")]
    InvalidOrExpiredToken,

    /// The reset notification could not be sent. The token may already
    /// exist when this surfaces.
    #[error("email dispatch failed: {0}")]
    EmailDispatch(String),

    /// Malformed input caught before spending a provider or database call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// A persisted row failed to decode.
    #[error("invalid stored record: {0}")]
    InvalidRecord(String),

    /// Password hashing failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),
}

impl Error {
    /// Whether this error represents a missing upstream resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Provider(p) if p.is_not_found())
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOrExpiredToken;
        assert_eq!(err.to_string(), "invalid or expired reset token");

        let err = Error::EmailDispatch("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_provider_not_found_classification() {
        let err = Error::Provider(ProviderError::NotFound);
        assert!(err.is_not_found());

        let err = Error::Provider(ProviderError::Timeout);
        assert!(!err.is_not_found());

        assert!(!Error::InvalidOrExpiredToken.is_not_found());
    }
}
