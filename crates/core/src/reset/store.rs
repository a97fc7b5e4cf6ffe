//! Reset-token persistence.
//!
//! Lookups filter on `expires_at > now`, so an expired row is simply
//! invisible; the purge sweep is hygiene, never a correctness requirement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_rusqlite::params;

use super::token::ResetToken;
use crate::db::Database;
use crate::error::Error;

/// Persistence collaborator for reset tokens.
#[async_trait]
pub trait ResetTokenStore: Send + Sync {
    /// Persist a freshly issued token.
    async fn create(&self, token: &ResetToken) -> Result<(), Error>;

    /// Look up an unexpired token by secret hash.
    async fn find_valid(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<ResetToken>, Error>;

    /// Remove every token owned by a user. Returns how many were removed.
    async fn delete_for_user(&self, user_id: i64) -> Result<u64, Error>;

    /// Remove one token by secret hash. Returns true if it existed.
    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, Error>;

    /// Delete rows whose expiry has passed. Returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, Error>;
}

/// SQLite-backed token store.
#[derive(Clone)]
pub struct SqliteResetTokenStore {
    db: Database,
}

impl SqliteResetTokenStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidRecord(format!("timestamp {raw:?}: {e}")))
}

#[async_trait]
impl ResetTokenStore for SqliteResetTokenStore {
    async fn create(&self, token: &ResetToken) -> Result<(), Error> {
        let token = token.clone();
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO password_reset_tokens (token_hash, user_id, expires_at, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        token.token_hash,
                        token.user_id,
                        token.expires_at.to_rfc3339(),
                        token.created_at.to_rfc3339()
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn find_valid(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<ResetToken>, Error> {
        let token_hash = token_hash.to_string();
        let now = now.to_rfc3339();
        self.db
            .conn
            .call(move |conn| -> Result<Option<ResetToken>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT token_hash, user_id, expires_at, created_at
                     FROM password_reset_tokens
                     WHERE token_hash = ?1 AND expires_at > ?2",
                )?;

                let result = stmt.query_row(params![token_hash, now], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                });

                match result {
                    Ok((token_hash, user_id, expires_at, created_at)) => Ok(Some(ResetToken {
                        user_id,
                        token_hash,
                        expires_at: parse_timestamp(&expires_at)?,
                        created_at: parse_timestamp(&created_at)?,
                    })),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_for_user(&self, user_id: i64) -> Result<u64, Error> {
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM password_reset_tokens WHERE user_id = ?1", params![user_id])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, Error> {
        let token_hash = token_hash.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let count =
                    conn.execute("DELETE FROM password_reset_tokens WHERE token_hash = ?1", params![token_hash])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        let now = now.to_rfc3339();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM password_reset_tokens WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reset::accounts::{AccountStore, SqliteAccountStore};
    use chrono::Duration;

    async fn store_with_user() -> (SqliteResetTokenStore, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let accounts = SqliteAccountStore::new(db.clone());
        let account = accounts.create("ripley@example.com", "game-over-man").await.unwrap();
        (SqliteResetTokenStore::new(db), account.id)
    }

    #[tokio::test]
    async fn test_create_and_find_valid() {
        let (store, user_id) = store_with_user().await;
        let now = Utc::now();
        let token = ResetToken::issue(user_id, "secret", now);

        store.create(&token).await.unwrap();

        let found = store.find_valid(&token.token_hash, now).await.unwrap().unwrap();
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.token_hash, token.token_hash);
    }

    #[tokio::test]
    async fn test_find_valid_excludes_expired() {
        let (store, user_id) = store_with_user().await;
        let now = Utc::now();
        let mut token = ResetToken::issue(user_id, "secret", now);
        token.expires_at = now - Duration::seconds(1);

        store.create(&token).await.unwrap();

        assert!(store.find_valid(&token.token_hash, now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_valid_missing_hash() {
        let (store, _user_id) = store_with_user().await;
        assert!(store.find_valid("nope", Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_for_user_counts() {
        let (store, user_id) = store_with_user().await;
        let now = Utc::now();
        store.create(&ResetToken::issue(user_id, "one", now)).await.unwrap();
        store.create(&ResetToken::issue(user_id, "two", now)).await.unwrap();

        assert_eq!(store.delete_for_user(user_id).await.unwrap(), 2);
        assert_eq!(store.delete_for_user(user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_hash() {
        let (store, user_id) = store_with_user().await;
        let now = Utc::now();
        let token = ResetToken::issue(user_id, "secret", now);
        store.create(&token).await.unwrap();

        assert!(store.delete_by_hash(&token.token_hash).await.unwrap());
        assert!(!store.delete_by_hash(&token.token_hash).await.unwrap());
        assert!(store.find_valid(&token.token_hash, now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purge_expired_leaves_fresh_rows() {
        let (store, user_id) = store_with_user().await;
        let now = Utc::now();
        let mut stale = ResetToken::issue(user_id, "stale", now);
        stale.expires_at = now - Duration::minutes(5);
        let fresh = ResetToken::issue(user_id, "fresh", now);
        store.create(&stale).await.unwrap();
        store.create(&fresh).await.unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 1);
        assert!(store.find_valid(&fresh.token_hash, now).await.unwrap().is_some());
    }
}
