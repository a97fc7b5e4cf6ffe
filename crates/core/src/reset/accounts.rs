//! Account collaborator.
//!
//! The token manager references accounts by id and email only; password
//! hashing lives entirely behind this trait, so a raw password goes in and
//! nothing but a bcrypt hash ever touches storage.

use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::params;

use crate::db::Database;
use crate::error::Error;

/// Work factor matching the rest of the deployment's credential store.
const BCRYPT_COST: u32 = 10;

/// The slice of an account the reset flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub email: String,
}

/// Account lookup and password mutation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Register an account. Hashes the password internally.
    async fn create(&self, email: &str, password: &str) -> Result<Account, Error>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error>;

    /// Replace the stored password hash with one for `new_password`.
    async fn set_password(&self, user_id: i64, new_password: &str) -> Result<(), Error>;

    /// Check a candidate password against the stored hash.
    async fn verify_password(&self, email: &str, password: &str) -> Result<bool, Error>;
}

/// SQLite-backed account store.
#[derive(Clone)]
pub struct SqliteAccountStore {
    db: Database,
}

impl SqliteAccountStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn hash_password(password: &str) -> Result<String, Error> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| Error::PasswordHash(e.to_string()))
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create(&self, email: &str, password: &str) -> Result<Account, Error> {
        let email = email.to_string();
        let password_hash = hash_password(password)?;
        self.db
            .conn
            .call(move |conn| -> Result<Account, Error> {
                conn.execute(
                    "INSERT INTO accounts (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
                    params![email, password_hash, Utc::now().to_rfc3339()],
                )?;
                Ok(Account { id: conn.last_insert_rowid(), email })
            })
            .await
            .map_err(Error::from)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        let email = email.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<Option<Account>, Error> {
                let mut stmt = conn.prepare("SELECT id, email FROM accounts WHERE email = ?1")?;
                let result = stmt.query_row(params![email], |row| {
                    Ok(Account { id: row.get(0)?, email: row.get(1)? })
                });

                match result {
                    Ok(account) => Ok(Some(account)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error> {
        self.db
            .conn
            .call(move |conn| -> Result<Option<Account>, Error> {
                let mut stmt = conn.prepare("SELECT id, email FROM accounts WHERE id = ?1")?;
                let result = stmt.query_row(params![id], |row| {
                    Ok(Account { id: row.get(0)?, email: row.get(1)? })
                });

                match result {
                    Ok(account) => Ok(Some(account)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn set_password(&self, user_id: i64, new_password: &str) -> Result<(), Error> {
        let password_hash = hash_password(new_password)?;
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                let updated = conn.execute(
                    "UPDATE accounts SET password_hash = ?1 WHERE id = ?2",
                    params![password_hash, user_id],
                )?;
                if updated == 0 {
                    return Err(Error::InvalidRecord(format!("no account with id {user_id}")));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn verify_password(&self, email: &str, password: &str) -> Result<bool, Error> {
        let email = email.to_string();
        let stored: Option<String> = self
            .db
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT password_hash FROM accounts WHERE email = ?1")?;
                let result = stmt.query_row(params![email], |row| row.get(0));

                match result {
                    Ok(hash) => Ok(Some(hash)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        match stored {
            Some(hash) => bcrypt::verify(password, &hash).map_err(|e| Error::PasswordHash(e.to_string())),
            None => Ok(false),
        }
    }
}
