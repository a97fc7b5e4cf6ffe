//! Password-reset token lifecycle.
//!
//! Single-use, time-limited, hashed tokens with at most one active token
//! per user. Issuing a new token removes every prior token for that user;
//! a successful reset deletes the record; natural expiry just makes the
//! row invisible to lookups.
//!
//! Failure reporting is deliberately opaque on the reset path: a missing
//! token, an expired token and an email mismatch are one and the same
//! failure to the caller.

pub mod accounts;
pub mod mailer;
pub mod store;
pub mod token;

pub use accounts::{Account, AccountStore, SqliteAccountStore};
pub use mailer::{LogMailer, Mailer, SmtpMailer};
pub use store::{ResetTokenStore, SqliteResetTokenStore};
pub use token::{RESET_TOKEN_TTL_SECS, ResetToken, generate_secret, hash_secret};

use std::sync::Arc;

use chrono::Utc;

use crate::error::Error;

/// Orchestrates the forgot/verify/reset operations over the persistence,
/// account and mail collaborators.
pub struct ResetManager {
    tokens: Arc<dyn ResetTokenStore>,
    accounts: Arc<dyn AccountStore>,
    mailer: Arc<dyn Mailer>,
    /// Base URL the emailed link points into, e.g. the web frontend origin.
    reset_url_base: String,
}

impl ResetManager {
    pub fn new(
        tokens: Arc<dyn ResetTokenStore>, accounts: Arc<dyn AccountStore>, mailer: Arc<dyn Mailer>,
        reset_url_base: impl Into<String>,
    ) -> Self {
        Self { tokens, accounts, mailer, reset_url_base: reset_url_base.into() }
    }

    /// Issue a reset token for the account registered under `email` and
    /// mail its raw secret as a link.
    ///
    /// An unknown email returns `Ok(())` with no further action, so the
    /// response shape never reveals whether an account exists. Issuing
    /// first removes every earlier token for the user.
    ///
    /// If the mail dispatch fails the token still exists; the error says
    /// so, and the next request replaces the orphan.
    pub async fn request_reset(&self, email: &str) -> Result<(), Error> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            tracing::info!("password reset requested for unknown email");
            return Ok(());
        };

        let removed = self.tokens.delete_for_user(account.id).await?;
        if removed > 0 {
            tracing::debug!("replaced {} prior reset token(s): user_id={}", removed, account.id);
        }

        let secret = generate_secret();
        let token = ResetToken::issue(account.id, &secret, Utc::now());
        self.tokens.create(&token).await?;

        let reset_url = format!("{}/reset-password?token={}&email={}", self.reset_url_base, secret, account.email);
        let html = format!(
            "<p>Click to reset password: <a href=\"{reset_url}\">{reset_url}</a></p>\
             <p>This link expires in 1 hour.</p>"
        );
        self.mailer.send(&account.email, "Password Reset - Cinesphere", &html).await?;

        tracing::info!("password reset link issued: user_id={}", account.id);
        Ok(())
    }

    /// Check whether a raw secret corresponds to a live token. No side
    /// effects; the token is not consumed.
    pub async fn verify_token(&self, raw_token: &str) -> Result<bool, Error> {
        let hash = hash_secret(raw_token);
        Ok(self.tokens.find_valid(&hash, Utc::now()).await?.is_some())
    }

    /// Consume a token and set a new password on its owning account.
    ///
    /// The supplied email must match the owning account's email; any
    /// mismatch, unknown or expired token yields the same
    /// [`Error::InvalidOrExpiredToken`]. A second call with the same secret
    /// fails: the record is deleted on success.
    pub async fn reset_password(&self, raw_token: &str, email: &str, new_password: &str) -> Result<(), Error> {
        let hash = hash_secret(raw_token);
        let Some(token) = self.tokens.find_valid(&hash, Utc::now()).await? else {
            return Err(Error::InvalidOrExpiredToken);
        };

        let account = self
            .accounts
            .find_by_id(token.user_id)
            .await?
            .ok_or(Error::InvalidOrExpiredToken)?;
        if account.email != email {
            return Err(Error::InvalidOrExpiredToken);
        }

        self.accounts.set_password(account.id, new_password).await?;
        self.tokens.delete_by_hash(&hash).await?;

        let confirmation = "<p>Your password has been reset successfully.</p>";
        if let Err(e) = self
            .mailer
            .send(&account.email, "Cinesphere Password Reset Successful", confirmation)
            .await
        {
            tracing::warn!("failed to send reset confirmation: {}", e);
        }

        tracing::info!("password reset completed: user_id={}", account.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct SentMail {
        to: String,
        subject: String,
        html: String,
    }

    /// Records every send; optionally reports dispatch failure afterwards.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<SentMail>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn failing() -> Self {
            Self { fail: true, ..Default::default() }
        }

        fn sent(&self) -> Vec<SentMail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), Error> {
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html: html.to_string(),
            });
            if self.fail { Err(Error::EmailDispatch("smtp unavailable".to_string())) } else { Ok(()) }
        }
    }

    struct Fixture {
        manager: ResetManager,
        tokens: Arc<SqliteResetTokenStore>,
        accounts: Arc<SqliteAccountStore>,
        mailer: Arc<RecordingMailer>,
        user_id: i64,
    }

    const EMAIL: &str = "ellen@example.com";

    async fn fixture_with_mailer(mailer: RecordingMailer) -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let tokens = Arc::new(SqliteResetTokenStore::new(db.clone()));
        let accounts = Arc::new(SqliteAccountStore::new(db));
        let mailer = Arc::new(mailer);
        let account = accounts.create(EMAIL, "original-password").await.unwrap();

        let manager = ResetManager::new(
            tokens.clone(),
            accounts.clone(),
            mailer.clone(),
            "https://cinesphere.example.com",
        );
        Fixture { manager, tokens, accounts, mailer, user_id: account.id }
    }

    async fn fixture() -> Fixture {
        fixture_with_mailer(RecordingMailer::default()).await
    }

    /// Pull the raw secret back out of the emailed reset link.
    fn secret_from(mail: &SentMail) -> String {
        mail.html
            .split("token=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_request_reset_emails_a_working_link() {
        let f = fixture().await;
        f.manager.request_reset(EMAIL).await.unwrap();

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, EMAIL);
        assert!(sent[0].html.contains("https://cinesphere.example.com/reset-password?token="));

        let secret = secret_from(&sent[0]);
        assert_eq!(secret.len(), 64);
        assert!(f.manager.verify_token(&secret).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_email_reports_success_and_sends_nothing() {
        let f = fixture().await;
        assert!(f.manager.request_reset("stranger@example.com").await.is_ok());
        assert!(f.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_second_request_invalidates_first_token() {
        let f = fixture().await;
        f.manager.request_reset(EMAIL).await.unwrap();
        f.manager.request_reset(EMAIL).await.unwrap();

        let sent = f.mailer.sent();
        let first = secret_from(&sent[0]);
        let second = secret_from(&sent[1]);

        assert!(!f.manager.verify_token(&first).await.unwrap());
        assert!(f.manager.verify_token(&second).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_has_no_side_effect() {
        let f = fixture().await;
        f.manager.request_reset(EMAIL).await.unwrap();
        let secret = secret_from(&f.mailer.sent()[0]);

        assert!(f.manager.verify_token(&secret).await.unwrap());
        assert!(f.manager.verify_token(&secret).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_password_is_single_use() {
        let f = fixture().await;
        f.manager.request_reset(EMAIL).await.unwrap();
        let secret = secret_from(&f.mailer.sent()[0]);

        f.manager.reset_password(&secret, EMAIL, "brand-new-password").await.unwrap();

        let replay = f.manager.reset_password(&secret, EMAIL, "another-password").await;
        assert!(matches!(replay, Err(Error::InvalidOrExpiredToken)));
        assert!(!f.manager.verify_token(&secret).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_password_updates_the_account() {
        let f = fixture().await;
        f.manager.request_reset(EMAIL).await.unwrap();
        let secret = secret_from(&f.mailer.sent()[0]);

        f.manager.reset_password(&secret, EMAIL, "brand-new-password").await.unwrap();

        assert!(f.accounts.verify_password(EMAIL, "brand-new-password").await.unwrap());
        assert!(!f.accounts.verify_password(EMAIL, "original-password").await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_sends_confirmation_mail() {
        let f = fixture().await;
        f.manager.request_reset(EMAIL).await.unwrap();
        let secret = secret_from(&f.mailer.sent()[0]);

        f.manager.reset_password(&secret, EMAIL, "brand-new-password").await.unwrap();

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].subject.contains("Successful"));
    }

    #[tokio::test]
    async fn test_email_mismatch_is_opaque_and_non_consuming() {
        let f = fixture().await;
        f.manager.request_reset(EMAIL).await.unwrap();
        let secret = secret_from(&f.mailer.sent()[0]);

        let result = f.manager.reset_password(&secret, "impostor@example.com", "pwd-123456").await;
        assert!(matches!(result, Err(Error::InvalidOrExpiredToken)));

        // The token survives a mismatched attempt.
        assert!(f.manager.verify_token(&secret).await.unwrap());
        assert!(f.accounts.verify_password(EMAIL, "original-password").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_fails_verify_and_reset() {
        let f = fixture().await;
        let now = Utc::now();
        let mut token = ResetToken::issue(f.user_id, "expired-secret", now);
        token.expires_at = now - Duration::seconds(1);
        f.tokens.create(&token).await.unwrap();

        assert!(!f.manager.verify_token("expired-secret").await.unwrap());
        let result = f.manager.reset_password("expired-secret", EMAIL, "pwd-123456").await;
        assert!(matches!(result, Err(Error::InvalidOrExpiredToken)));
    }

    #[tokio::test]
    async fn test_fresh_token_passes_expiry_boundary() {
        let f = fixture().await;
        let token = ResetToken::issue(f.user_id, "fresh-secret", Utc::now());
        f.tokens.create(&token).await.unwrap();

        assert!(f.manager.verify_token("fresh-secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_garbage_token_fails() {
        let f = fixture().await;
        assert!(!f.manager.verify_token("not-a-real-secret").await.unwrap());
        let result = f.manager.reset_password("not-a-real-secret", EMAIL, "pwd-123456").await;
        assert!(matches!(result, Err(Error::InvalidOrExpiredToken)));
    }

    #[tokio::test]
    async fn test_dispatch_failure_surfaces_but_token_persists() {
        let f = fixture_with_mailer(RecordingMailer::failing()).await;

        let result = f.manager.request_reset(EMAIL).await;
        assert!(matches!(result, Err(Error::EmailDispatch(_))));

        // The token outlives the failed dispatch; the next request will
        // replace it via the at-most-one rule.
        let secret = secret_from(&f.mailer.sent()[0]);
        assert!(f.manager.verify_token(&secret).await.unwrap());
    }
}
