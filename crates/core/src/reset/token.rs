//! Reset-token primitives: secret generation and one-way hashing.
//!
//! The raw secret exists only in the emailed link and the reset request;
//! storage and comparison always go through the SHA-256 hash.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Lifetime of a reset token.
pub const RESET_TOKEN_TTL_SECS: i64 = 3600;

/// A stored reset token. Holds only the hash of the secret.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Owning account, referenced by id only.
    pub user_id: i64,
    /// SHA-256 of the raw secret, hex encoded.
    pub token_hash: String,
    /// Fixed at creation; lookups treat the token as absent past this.
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    /// Build the record for a freshly generated secret.
    pub fn issue(user_id: i64, raw_secret: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token_hash: hash_secret(raw_secret),
            expires_at: now + Duration::seconds(RESET_TOKEN_TTL_SECS),
            created_at: now,
        }
    }
}

/// Generate a fresh token secret: 32 random bytes, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// One-way hash of a raw secret, the only form ever persisted or compared.
pub fn hash_secret(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_shape() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_secrets_are_unique() {
        assert_ne!(generate_secret(), generate_secret());
    }

    #[test]
    fn test_hash_stability() {
        let secret = generate_secret();
        assert_eq!(hash_secret(&secret), hash_secret(&secret));
    }

    #[test]
    fn test_hash_differs_from_secret() {
        let secret = generate_secret();
        let hash = hash_secret(&secret);
        assert_ne!(hash, secret);
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_issue_sets_one_hour_window() {
        let now = Utc::now();
        let token = ResetToken::issue(7, "secret", now);
        assert_eq!(token.user_id, 7);
        assert_eq!(token.created_at, now);
        assert_eq!(token.expires_at - now, Duration::seconds(3600));
        assert_eq!(token.token_hash, hash_secret("secret"));
    }
}
