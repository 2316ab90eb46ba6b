//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// JSON login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The current one-time password.
    pub otp_token: String,
}

/// JSON login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Freshly issued API key.
    pub api_key: String,
}

/// Result of `GET /auth/status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether the request carried a live API key.
    pub authenticated: bool,
}
