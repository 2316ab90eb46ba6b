//! Login and key management handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{CONTENT_TYPE, EXPIRES},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

use crate::auth::{require_authenticated, Authentication};
use crate::dto::{AuthStatus, LoginRequest, LoginResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AuthState;

/// Creates the auth router.
///
/// The bearer gate is not part of this router; install it once around the
/// whole application so every route sees the authentication flag.
pub fn auth_router() -> Router<AuthState> {
    let admin = Router::new()
        .route("/auth/keys", delete(revoke_keys))
        .route_layer(middleware::from_fn(require_authenticated));

    Router::new()
        .route("/auth", post(login))
        .route("/auth/status", get(auth_status))
        .merge(admin)
}

/// POST /auth - Exchange a one-time password for an API key
///
/// JSON requests get a JSON answer; anything else is treated as the bare
/// code in plain text and answered with the bare key.
async fn login(
    State(state): State<AuthState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let json = is_json(&headers);

    let code = if json {
        serde_json::from_slice::<LoginRequest>(&body)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
            .otp_token
    } else {
        String::from_utf8(body.to_vec())
            .map_err(|_| ApiError::BadRequest("body is not valid UTF-8".to_string()))?
    };

    let api_key = state.login.login(&code).await?;
    let expires = expires_header(&state);

    let mut response = if json {
        Json(LoginResponse { api_key }).into_response()
    } else {
        api_key.into_response()
    };
    if let Some(expires) = expires {
        response.headers_mut().insert(EXPIRES, expires);
    }
    Ok(response)
}

/// GET /auth/status - Report whether the caller is authenticated
async fn auth_status(auth: Authentication) -> Json<AuthStatus> {
    Json(AuthStatus {
        authenticated: auth.is_authenticated(),
    })
}

/// DELETE /auth/keys - Revoke every issued key
async fn revoke_keys(State(state): State<AuthState>) -> StatusCode {
    state.cache().clear();
    tracing::info!("all API keys revoked");
    StatusCode::NO_CONTENT
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// RFC 3339 timestamp at which the key bucket lapses.
fn expires_header(state: &AuthState) -> Option<HeaderValue> {
    let ttl = chrono::Duration::from_std(state.cache().remaining_ttl()?).ok()?;
    let at = chrono::Utc::now().checked_add_signed(ttl)?;
    HeaderValue::from_str(&at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)).ok()
}
