//! API error types.
//!
//! Maps auth core failures to HTTP responses with a small JSON body.

use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use folio_auth::AuthError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed or unknown credentials.
    #[error("Authentication required")]
    Unauthorized,

    /// Request body could not be understood.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Failure from the auth core.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::Auth(AuthError::InvalidOtp) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::SecretNotFound) => StatusCode::NOT_FOUND,
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::BadRequest(_) => "bad_request",
            Self::Auth(err) => match err {
                AuthError::InvalidOtp => "invalid_otp",
                AuthError::SecretNotFound => "secret_not_found",
                AuthError::Configuration(_) => "configuration_error",
                AuthError::Storage(_) => "storage_error",
                AuthError::Entropy(_) => "entropy_error",
                AuthError::Internal(_) => "internal_error",
            },
        }
    }

    /// Text shown to the client. Server-side details stay in the log.
    fn description(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.description()),
        };

        if status == StatusCode::UNAUTHORIZED {
            (status, [(WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
