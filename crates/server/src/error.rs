//! HTTP error mapping.
//!
//! Core errors carry full detail; what leaves the server is a status code
//! and a short message. Reset-flow failures keep the same generic wording
//! regardless of which branch failed.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use cinesphere_core::Error;

/// A classified, user-presentable API failure.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, message) = match &err {
            e if e.is_not_found() => (StatusCode::NOT_FOUND, "Not found"),
            Error::Provider(_) => (StatusCode::BAD_GATEWAY, "Upstream metadata provider unavailable"),
            Error::InvalidOrExpiredToken => (StatusCode::BAD_REQUEST, "Invalid or expired reset token"),
            Error::EmailDispatch(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email"),
            Error::InvalidInput(msg) => return Self { status: StatusCode::BAD_REQUEST, message: msg.clone() },
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", err);
        } else {
            tracing::debug!("request rejected: {}", err);
        }

        Self { status, message: message.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinesphere_client::ProviderError;

    #[test]
    fn test_provider_not_found_maps_to_404() {
        let err = ApiError::from(Error::Provider(ProviderError::NotFound));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_provider_failure_maps_to_502() {
        let err = ApiError::from(Error::Provider(ProviderError::Timeout));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_token_failure_is_generic_400() {
        let err = ApiError::from(Error::InvalidOrExpiredToken);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid or expired reset token");
    }

    #[test]
    fn test_email_dispatch_maps_to_500() {
        let err = ApiError::from(Error::EmailDispatch("boom".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to send email");
    }
}
