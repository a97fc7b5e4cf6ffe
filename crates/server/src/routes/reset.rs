//! Password-reset routes.
//!
//! The forgot route answers with the same message whether or not the email
//! maps to an account. The reset route's failure wording never separates a
//! bad token from a bad email.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody {
    pub token: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyTokenBody {
    pub token: String,
}

fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("A valid email is required"));
    }
    Ok(email)
}

fn validate_new_password(body: &ResetPasswordBody) -> Result<(), ApiError> {
    if body.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::bad_request("Password must be at least 6 characters"));
    }
    if body.password != body.confirm_password {
        return Err(ApiError::bad_request("Passwords do not match"));
    }
    Ok(())
}

pub async fn forgot(
    State(state): State<AppState>, Json(body): Json<ForgotPasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = validate_email(&body.email)?;

    state.reset.request_reset(email).await?;

    Ok(Json(MessageResponse { message: "If email exists, reset link sent." }))
}

pub async fn reset(
    State(state): State<AppState>, Json(body): Json<ResetPasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = validate_email(&body.email)?;
    validate_new_password(&body)?;
    if body.token.trim().is_empty() {
        return Err(ApiError::bad_request("Token required"));
    }

    state.reset.reset_password(body.token.trim(), email, &body.password).await?;

    Ok(Json(MessageResponse { message: "Password reset successful" }))
}

pub async fn verify_token(
    State(state): State<AppState>, Json(body): Json<VerifyTokenBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = body.token.trim();
    if token.is_empty() {
        return Err(ApiError::bad_request("Token required"));
    }

    if state.reset.verify_token(token).await? {
        Ok(Json(MessageResponse { message: "Token valid" }))
    } else {
        Err(ApiError::bad_request("Invalid or expired reset token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(password: &str, confirm: &str) -> ResetPasswordBody {
        ResetPasswordBody {
            token: "t".repeat(64),
            email: "user@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert_eq!(validate_email("  user@example.com  ").unwrap(), "user@example.com");
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn test_password_length_floor() {
        assert!(validate_new_password(&body("short", "short")).is_err());
        assert!(validate_new_password(&body("longer-than-six", "longer-than-six")).is_ok());
    }

    #[test]
    fn test_password_confirmation_must_match() {
        assert!(validate_new_password(&body("longer-than-six", "different-value")).is_err());
    }

    #[test]
    fn test_reset_body_accepts_camel_case() {
        let parsed: ResetPasswordBody = serde_json::from_str(
            r#"{"token": "abc", "email": "user@example.com", "password": "secret1", "confirmPassword": "secret1"}"#,
        )
        .unwrap();
        assert_eq!(parsed.confirm_password, "secret1");
    }
}
